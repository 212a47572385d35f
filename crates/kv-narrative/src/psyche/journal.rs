//! Audit trail of psychological mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Dimension;

/// One recorded mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentalEvent {
    /// Which dimension changed.
    pub dimension: Dimension,
    /// Applied change, `after - before`.
    pub delta: i32,
    /// Value before the change.
    pub before: i32,
    /// Value after clamping.
    pub after: i32,
    /// What caused it.
    pub cause: String,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

impl MentalEvent {
    /// The change that actually landed after clamping.
    pub fn applied(&self) -> i32 {
        self.after - self.before
    }
}

/// A chronological log of mutations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentalJournal {
    events: Vec<MentalEvent>,
}

impl MentalJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn append(&mut self, event: MentalEvent) {
        self.events.push(event);
    }

    /// All events, oldest first.
    pub fn events(&self) -> &[MentalEvent] {
        &self.events
    }

    /// Events for one dimension.
    pub fn for_dimension(&self, dimension: Dimension) -> impl Iterator<Item = &MentalEvent> {
        self.events.iter().filter(move |e| e.dimension == dimension)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(dimension: Dimension, delta: i32, before: i32, after: i32) -> MentalEvent {
        MentalEvent {
            dimension,
            delta,
            before,
            after,
            cause: "test".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn append_and_filter() {
        let mut journal = MentalJournal::new();
        assert!(journal.is_empty());
        journal.append(event(Dimension::Sanity, -20, 100, 80));
        journal.append(event(Dimension::Stress, 10, 0, 10));
        journal.append(event(Dimension::Sanity, 50, 80, 100));
        assert_eq!(journal.len(), 3);
        assert_eq!(journal.for_dimension(Dimension::Sanity).count(), 2);
    }

    #[test]
    fn applied_reflects_clamp() {
        assert_eq!(event(Dimension::Sanity, 50, 80, 100).applied(), 20);
    }
}
