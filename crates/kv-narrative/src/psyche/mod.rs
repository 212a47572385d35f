//! The player's psychological state.
//!
//! Five scalars (sanity, stress, doubt, obsession, paranoia) plus two legacy
//! mirrors (`stability` for sanity, `mental_load` for stress). Sanity is
//! clamped to 0–100; stress, doubt and obsession are floored at zero and
//! unbounded above. Every mutation is journaled with its cause.

mod journal;
mod paranoia;
mod state;
mod tier;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NarrativeError, NarrativeResult};

pub use journal::{MentalEvent, MentalJournal};
pub use paranoia::{MAX_PARANOIA, ParanoiaVector};
pub use state::{PsychologicalState, RecoveryAction};
pub use tier::{ClarityLabel, DoubtSymptom, ObsessionSymptom, StabilityTier, StressSymptom};

/// A named psychological dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Sanity, 0–100.
    Sanity,
    /// Legacy mirror of sanity.
    Stability,
    /// Stress accumulator.
    Stress,
    /// Legacy mirror of stress.
    MentalLoad,
    /// Doubt accumulator.
    Doubt,
    /// Obsession accumulator.
    Obsession,
    /// Paranoia, routed to a per-source bucket.
    Paranoia,
}

impl Dimension {
    /// All dimensions.
    pub const ALL: [Dimension; 7] = [
        Self::Sanity,
        Self::Stability,
        Self::Stress,
        Self::MentalLoad,
        Self::Doubt,
        Self::Obsession,
        Self::Paranoia,
    ];

    /// Parse a dimension name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_lowercase() })
            .collect();
        match key.as_str() {
            "sanity" => Some(Self::Sanity),
            "stability" => Some(Self::Stability),
            "stress" => Some(Self::Stress),
            "mental_load" | "mentalload" => Some(Self::MentalLoad),
            "doubt" => Some(Self::Doubt),
            "obsession" => Some(Self::Obsession),
            "paranoia" => Some(Self::Paranoia),
            _ => None,
        }
    }

    /// Parse a dimension name or fail with [`NarrativeError::UnknownDimension`].
    pub fn from_name(s: &str) -> NarrativeResult<Self> {
        Self::parse(s).ok_or_else(|| NarrativeError::UnknownDimension(s.to_string()))
    }

    /// The canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sanity => "sanity",
            Self::Stability => "stability",
            Self::Stress => "stress",
            Self::MentalLoad => "mental_load",
            Self::Doubt => "doubt",
            Self::Obsession => "obsession",
            Self::Paranoia => "paranoia",
        }
    }

    /// Resolve a legacy mirror to the dimension it mirrors.
    pub fn canonical(self) -> Self {
        match self {
            Self::Stability => Self::Sanity,
            Self::MentalLoad => Self::Stress,
            other => other,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Dimension::parse("Sanity"), Some(Dimension::Sanity));
        assert_eq!(Dimension::parse("MENTAL_LOAD"), Some(Dimension::MentalLoad));
        assert_eq!(Dimension::parse("mental load"), Some(Dimension::MentalLoad));
        assert_eq!(Dimension::parse("courage"), None);
    }

    #[test]
    fn names_round_trip() {
        for dim in Dimension::ALL {
            assert_eq!(Dimension::parse(dim.name()), Some(dim));
        }
    }

    #[test]
    fn unknown_name_is_error() {
        let err = Dimension::from_name("willpower").unwrap_err();
        assert!(matches!(err, NarrativeError::UnknownDimension(ref n) if n == "willpower"));
    }

    #[test]
    fn mirrors_resolve() {
        assert_eq!(Dimension::Stability.canonical(), Dimension::Sanity);
        assert_eq!(Dimension::MentalLoad.canonical(), Dimension::Stress);
        assert_eq!(Dimension::Doubt.canonical(), Dimension::Doubt);
    }
}
