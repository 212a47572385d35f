//! Paranoia as a per-source accumulation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Upper bound on the total paranoia magnitude.
pub const MAX_PARANOIA: i32 = 100;

/// Paranoia broken down by the source that caused it.
///
/// Each bucket is floored at zero. Increases are trimmed so the buckets
/// never sum past [`MAX_PARANOIA`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParanoiaVector {
    buckets: BTreeMap<String, i32>,
}

impl ParanoiaVector {
    /// Create an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `magnitude` (possibly negative) to the `source` bucket.
    ///
    /// Returns the new total magnitude.
    pub fn add(&mut self, source: &str, magnitude: i32) -> i32 {
        let magnitude = magnitude.min(MAX_PARANOIA - self.magnitude());
        let source = source.trim().to_lowercase();
        let bucket = self.buckets.entry(source.clone()).or_insert(0);
        *bucket = bucket.saturating_add(magnitude).max(0);
        if *bucket == 0 {
            self.buckets.remove(&source);
        }
        self.magnitude()
    }

    /// Remove up to `amount` from the buckets, largest first.
    ///
    /// Returns how much was actually removed.
    pub fn relieve(&mut self, amount: i32) -> i32 {
        let mut remaining = amount.max(0);
        while remaining > 0 {
            let Some((source, level)) = self.dominant().map(|(s, l)| (s.to_string(), l)) else {
                break;
            };
            let taken = level.min(remaining);
            self.add(&source, -taken);
            remaining -= taken;
        }
        amount.max(0) - remaining
    }

    /// Total magnitude.
    pub fn magnitude(&self) -> i32 {
        self.buckets.values().fold(0i32, |acc, v| acc.saturating_add(*v))
    }

    /// The largest bucket. Ties go to the alphabetically first source.
    pub fn dominant(&self) -> Option<(&str, i32)> {
        self.buckets
            .iter()
            .fold(None, |best: Option<(&str, i32)>, (source, &level)| match best {
                Some((_, top)) if top >= level => best,
                _ => Some((source.as_str(), level)),
            })
    }

    /// Level of one source.
    pub fn source(&self, source: &str) -> i32 {
        self.buckets
            .get(&source.trim().to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// All non-empty buckets.
    pub fn sources(&self) -> impl Iterator<Item = (&str, i32)> {
        self.buckets.iter().map(|(s, l)| (s.as_str(), *l))
    }

    /// Whether no paranoia has accumulated.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
