//! Fractures: rare, out-of-context breaks in rendered text.

use std::fmt;

use chrono::{DateTime, Utc};
use kv_core::{FlagValue, GameSnapshot};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::FractureConfig;

/// Flag that forces a fracture. A text value may name the kind.
pub const FORCE_FLAG: &str = "trigger_fracture";

const WRONG_TIMESTAMPS: &[&str] = &[
    "[03:47 AM - Day ???]",
    "[TIME ERROR: NEGATIVE VALUE]",
    "[Entry 347 of 346]",
    "[October 47th, 1995]",
];

const WRONG_NAMES: &[&str] = &["[REDACTED]", "the other one", "█████", "yourself"];

const INTRUSIVE_PARAGRAPHS: &[&str] = &[
    "(You remember writing this. But you haven't yet.)",
    "[This section appears to be from a different document entirely.]",
    "You skip ahead. The page is blank. You go back. The words are different now.",
    "[Note: The investigator is reminded that they are not the first. They are not the last.]",
];

const UNSAFE_MESSAGES: &[&str] = &[
    "[This page has been torn out. By you.]",
    "[INSTRUCTION: Do not look at the aurora directly. Do not count the missing. Do not remember.]",
    "[Iteration: 347]",
];

/// The shape a fracture takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractureKind {
    /// An impossible timestamp above the text.
    Timestamp,
    /// A sentence said twice.
    Repetition,
    /// Someone else continues the narration.
    WrongName,
    /// A paragraph that does not belong.
    IntrusiveParagraph,
    /// The text is gone, replaced by an unsafe message.
    Replacement,
}

impl FractureKind {
    /// All kinds.
    pub const ALL: [FractureKind; 5] = [
        Self::Timestamp,
        Self::Repetition,
        Self::WrongName,
        Self::IntrusiveParagraph,
        Self::Replacement,
    ];

    /// Parse a kind name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "timestamp" => Some(Self::Timestamp),
            "repetition" | "repeat" => Some(Self::Repetition),
            "wrong_name" => Some(Self::WrongName),
            "intrusive_paragraph" | "extra_paragraph" => Some(Self::IntrusiveParagraph),
            "replacement" | "replace" => Some(Self::Replacement),
            _ => None,
        }
    }

    /// Snake-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Repetition => "repetition",
            Self::WrongName => "wrong_name",
            Self::IntrusiveParagraph => "intrusive_paragraph",
            Self::Replacement => "replacement",
        }
    }
}

impl fmt::Display for FractureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decide whether a fracture fires, and which.
///
/// The forced flag wins outright. Otherwise an unsafe state (attention or
/// obsession at threshold) rolls `probability`, and a safe state rolls
/// `base_chance`.
pub fn fracture_gate<R: Rng>(
    snapshot: &GameSnapshot,
    config: &FractureConfig,
    rng: &mut R,
) -> Option<FractureKind> {
    if let Some(forced) = snapshot.flag(FORCE_FLAG)
        && forced.is_truthy()
    {
        let named = match forced {
            FlagValue::Text(name) => FractureKind::parse(name),
            _ => None,
        };
        return Some(named.unwrap_or_else(|| random_kind(rng)));
    }
    let unsafe_state = snapshot.attention >= config.attention_threshold
        || snapshot.mental.obsession >= config.obsession_threshold;
    let chance = if unsafe_state {
        config.probability
    } else {
        config.base_chance
    };
    if chance > 0.0 && rng.random::<f64>() < chance {
        Some(random_kind(rng))
    } else {
        None
    }
}

fn random_kind<R: Rng>(rng: &mut R) -> FractureKind {
    FractureKind::ALL
        .choose(rng)
        .copied()
        .unwrap_or(FractureKind::Timestamp)
}

/// Apply `kind` to `text`.
pub fn apply_fracture<R: Rng>(text: &str, kind: FractureKind, rng: &mut R) -> String {
    match kind {
        FractureKind::Timestamp => {
            format!("{}\n\n{text}", pick(WRONG_TIMESTAMPS, rng))
        }
        FractureKind::Repetition => {
            let sentences: Vec<&str> = text.split(". ").collect();
            if sentences.len() < 2 {
                return format!("{text}\n\n{text}");
            }
            let idx = rng.random_range(0..sentences.len() - 1);
            let mut repeated = sentences.clone();
            repeated.insert(idx + 1, sentences[idx]);
            repeated.join(". ")
        }
        FractureKind::WrongName => {
            format!("{text}\n\n[{} continues...]", pick(WRONG_NAMES, rng))
        }
        FractureKind::IntrusiveParagraph => {
            format!("{text}\n\n{}", pick(INTRUSIVE_PARAGRAPHS, rng))
        }
        FractureKind::Replacement => pick(UNSAFE_MESSAGES, rng).to_string(),
    }
}

fn pick<'a, R: Rng>(options: &[&'a str], rng: &mut R) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

/// One fracture that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractureRecord {
    /// What fired.
    pub kind: FractureKind,
    /// Scene or menu it fired in.
    pub scene_id: String,
    /// When.
    pub timestamp: DateTime<Utc>,
}

/// Every fracture in a session, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FractureHistory {
    records: Vec<FractureRecord>,
}

impl FractureHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a firing.
    pub fn record(&mut self, kind: FractureKind, scene_id: &str) {
        info!(kind = %kind, scene = scene_id, "fracture");
        self.records.push(FractureRecord {
            kind,
            scene_id: scene_id.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// All records.
    pub fn records(&self) -> &[FractureRecord] {
        &self.records
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&FractureRecord> {
        self.records.last()
    }

    /// How many fractures fired.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether none have fired.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn forced_flag_names_kind() {
        let snapshot = GameSnapshot::default().with_flag(FORCE_FLAG, "wrong_name");
        let kind = fracture_gate(&snapshot, &FractureConfig::default(), &mut rng());
        assert_eq!(kind, Some(FractureKind::WrongName));
    }

    #[test]
    fn forced_flag_without_kind_still_fires() {
        let snapshot = GameSnapshot::default().with_flag(FORCE_FLAG, true);
        assert!(fracture_gate(&snapshot, &FractureConfig::default(), &mut rng()).is_some());
    }

    #[test]
    fn false_flag_does_not_force() {
        let snapshot = GameSnapshot::default().with_flag(FORCE_FLAG, false);
        assert_eq!(fracture_gate(&snapshot, &FractureConfig::default(), &mut rng()), None);
    }

    #[test]
    fn safe_state_with_zero_base_never_fires() {
        let config = FractureConfig::default();
        let mut rng = rng();
        for _ in 0..200 {
            assert_eq!(fracture_gate(&GameSnapshot::default(), &config, &mut rng), None);
        }
    }

    #[test]
    fn unsafe_state_fires_at_certainty() {
        let config = FractureConfig {
            probability: 1.0,
            ..FractureConfig::default()
        };
        let snapshot = GameSnapshot {
            attention: 80,
            ..GameSnapshot::default()
        };
        assert!(fracture_gate(&snapshot, &config, &mut rng()).is_some());
    }

    #[test]
    fn timestamp_prefixes() {
        let out = apply_fracture("The diner is empty.", FractureKind::Timestamp, &mut rng());
        assert!(out.starts_with('['));
        assert!(out.ends_with("\n\nThe diner is empty."));
    }

    #[test]
    fn repetition_duplicates_a_sentence() {
        let text = "One. Two. Three.";
        let out = apply_fracture(text, FractureKind::Repetition, &mut rng());
        assert_eq!(out.split(". ").count(), 4);
    }

    #[test]
    fn replacement_discards_text() {
        let out = apply_fracture("The diner is empty.", FractureKind::Replacement, &mut rng());
        assert!(!out.contains("diner"));
        assert!(UNSAFE_MESSAGES.contains(&out.as_str()));
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in FractureKind::ALL {
            assert_eq!(FractureKind::parse(kind.name()), Some(kind));
        }
    }

    #[test]
    fn history_records() {
        let mut history = FractureHistory::new();
        history.record(FractureKind::Timestamp, "diner");
        assert_eq!(history.len(), 1);
        assert_eq!(history.last().unwrap().scene_id, "diner");
    }
}
