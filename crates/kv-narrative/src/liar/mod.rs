//! Contradiction detection between dialogue and held evidence.
//!
//! Each catalogue pattern recognizes a claim (solitude, absence, an event
//! that never happened) and names the evidence tags that falsify it. When
//! dialogue matches a pattern and the player holds a falsifying tag, the
//! engine rolls the gating skill and, on success, emits an [`Interrupt`].
//! No match means an empty list. The engine never invents contradictions.

mod catalogue;

use std::fmt;

use kv_core::EvidenceLog;
use kv_mechanics::{CheckOutcome, DiceSource, Skill, roll_check};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::LiarConfig;
use crate::error::{NarrativeError, NarrativeResult};

pub use catalogue::{CompiledPattern, PatternSpec, default_patterns};

/// Check margin at which a caught lie counts as glaring.
pub const GLARING_MARGIN: i32 = 5;

/// How obvious the caught lie is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Barely caught.
    Subtle,
    /// Caught with room to spare.
    Glaring,
}

impl Severity {
    /// Severity for a successful check.
    pub fn from_outcome(outcome: &CheckOutcome) -> Self {
        if outcome.margin() >= GLARING_MARGIN {
            Self::Glaring
        } else {
            Self::Subtle
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subtle => write!(f, "subtle"),
            Self::Glaring => write!(f, "glaring"),
        }
    }
}

/// A claim in dialogue that held evidence falsifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    /// Pattern that matched.
    pub pattern_id: String,
    /// Evidence that falsifies the claim.
    pub evidence_id: String,
    /// Description of that evidence.
    pub evidence_description: String,
    /// The matched phrase.
    pub matched: String,
    /// The pattern's explanation line.
    pub message: String,
}

impl Contradiction {
    /// Explanation naming the contradicting evidence.
    pub fn explanation(&self) -> String {
        format!(
            "{} [{}: {}]",
            self.message, self.evidence_id, self.evidence_description
        )
    }
}

/// A caught lie, surfaced mid-dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interrupt {
    /// Name of the skill that caught it.
    pub skill: String,
    /// Pattern that matched.
    pub pattern_id: String,
    /// Evidence that falsifies the claim.
    pub evidence_id: String,
    /// The matched phrase.
    pub matched: String,
    /// Why the engine intervened.
    pub explanation: String,
    /// How obvious the lie was.
    pub severity: Severity,
    /// The gating check.
    pub check: CheckOutcome,
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.skill.to_uppercase(), self.explanation)
    }
}

/// Screens dialogue against held evidence.
#[derive(Debug, Clone)]
pub struct LiarEngine {
    skill: Skill,
    difficulty: i32,
    patterns: Vec<CompiledPattern>,
}

impl LiarEngine {
    /// Compile the catalogue. Fails on the first bad pattern.
    pub fn new(config: &LiarConfig) -> NarrativeResult<Self> {
        let skill = Skill::parse(&config.skill).ok_or_else(|| {
            NarrativeError::InvalidConfig(format!(
                "unknown gating skill '{}'",
                config.skill
            ))
        })?;
        let patterns = config
            .patterns
            .iter()
            .map(PatternSpec::compile)
            .collect::<NarrativeResult<Vec<_>>>()?;
        Ok(Self {
            skill,
            difficulty: config.difficulty,
            patterns,
        })
    }

    /// The gating skill.
    pub fn skill(&self) -> Skill {
        self.skill
    }

    /// The gating difficulty.
    pub fn difficulty(&self) -> i32 {
        self.difficulty
    }

    /// Number of compiled patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Every falsified claim in `dialogue`, without rolling.
    pub fn scan(&self, dialogue: &str, evidence: &EvidenceLog) -> Vec<Contradiction> {
        if evidence.is_empty() {
            return Vec::new();
        }
        let held = evidence.tags();
        self.patterns
            .iter()
            .filter_map(|pattern| {
                let matched = pattern.find(dialogue)?;
                let spec = pattern.spec();
                let tag = spec.falsified_by.iter().find(|t| held.contains(*t))?;
                let item = evidence.first_with_tag(tag)?;
                Some(Contradiction {
                    pattern_id: spec.id.clone(),
                    evidence_id: item.id.clone(),
                    evidence_description: item.description.clone(),
                    matched: matched.to_string(),
                    message: spec.message.clone(),
                })
            })
            .collect()
    }

    /// Scan `dialogue` and roll the gating skill once per contradiction.
    ///
    /// Only successful checks become interrupts.
    pub fn check_contradictions<D: DiceSource + ?Sized>(
        &self,
        dialogue: &str,
        evidence: &EvidenceLog,
        skill_level: i32,
        dice: &mut D,
    ) -> Vec<Interrupt> {
        self.scan(dialogue, evidence)
            .into_iter()
            .filter_map(|contradiction| {
                let check = roll_check(skill_level, self.difficulty, dice);
                if !check.success {
                    return None;
                }
                let interrupt = Interrupt {
                    skill: self.skill.name().to_string(),
                    explanation: contradiction.explanation(),
                    pattern_id: contradiction.pattern_id,
                    evidence_id: contradiction.evidence_id,
                    matched: contradiction.matched,
                    severity: Severity::from_outcome(&check),
                    check,
                };
                info!(
                    pattern = %interrupt.pattern_id,
                    evidence = %interrupt.evidence_id,
                    severity = %interrupt.severity,
                    "contradiction caught"
                );
                Some(interrupt)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv_core::{Evidence, EvidenceCategory};
    use kv_mechanics::FixedDice;

    const ALIBI: &str = "The suspect says: 'I was alone. No one else was around that night.'";

    fn engine() -> LiarEngine {
        LiarEngine::new(&LiarConfig::default()).unwrap()
    }

    fn witness_log() -> EvidenceLog {
        let mut log = EvidenceLog::new();
        log.add(
            Evidence::new(
                "witness_01",
                "A witness saw a tall man.",
                EvidenceCategory::Testimony,
            )
            .with_tag("witness_seen"),
        )
        .unwrap();
        log
    }

    #[test]
    fn witness_contradiction_interrupts() {
        let mut dice = FixedDice::new(vec![5, 5]);
        let interrupts = engine().check_contradictions(ALIBI, &witness_log(), 3, &mut dice);
        assert_eq!(interrupts.len(), 1);
        let interrupt = &interrupts[0];
        assert_eq!(interrupt.skill, "Skepticism");
        assert!(interrupt.explanation.contains("witness"));
        assert_eq!(interrupt.evidence_id, "witness_01");
        assert_eq!(interrupt.pattern_id, "witness_seen");
        assert_eq!(interrupt.severity, Severity::Glaring);
        assert!(interrupt.to_string().starts_with("[SKEPTICISM]"));
    }

    #[test]
    fn no_evidence_means_silence() {
        let mut dice = FixedDice::new(vec![10, 10]);
        let interrupts = engine().check_contradictions(ALIBI, &EvidenceLog::new(), 6, &mut dice);
        assert!(interrupts.is_empty());
        assert_eq!(dice.rolled(), 0);
    }

    #[test]
    fn unrelated_dialogue_is_silent() {
        let mut dice = FixedDice::new(vec![10, 10]);
        let interrupts =
            engine().check_contradictions("Lovely weather today.", &witness_log(), 6, &mut dice);
        assert!(interrupts.is_empty());
    }

    #[test]
    fn failed_check_suppresses() {
        let mut dice = FixedDice::new(vec![1, 2]);
        let interrupts = engine().check_contradictions(ALIBI, &witness_log(), 0, &mut dice);
        assert!(interrupts.is_empty());
        assert_eq!(dice.rolled(), 2);
    }

    #[test]
    fn subtle_when_margin_small() {
        let mut dice = FixedDice::new(vec![4, 4]);
        let interrupts = engine().check_contradictions(ALIBI, &witness_log(), 0, &mut dice);
        assert_eq!(interrupts[0].severity, Severity::Subtle);
    }

    #[test]
    fn evidence_id_counts_as_tag() {
        let mut log = EvidenceLog::new();
        log.add(Evidence::new(
            "police_record",
            "A 1987 incident report.",
            EvidenceCategory::Document,
        ))
        .unwrap();
        let found = engine().scan("There are no records of that.", &log);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched, "no records");
        assert!(found[0].explanation().contains("police_record"));
    }

    #[test]
    fn one_roll_per_matched_pattern() {
        let mut log = witness_log();
        log.add(
            Evidence::new("tape_03", "VHS from the treeline.", EvidenceCategory::Recording)
                .with_tag("camera_footage_woods"),
        )
        .unwrap();
        let mut dice = FixedDice::new(vec![6, 6]);
        let text = "No one was there. I was at home all night.";
        let interrupts = engine().check_contradictions(text, &log, 0, &mut dice);
        assert_eq!(interrupts.len(), 2);
        assert_eq!(dice.rolled(), 4);
    }

    #[test]
    fn bad_catalogue_fails_to_build() {
        let config = LiarConfig {
            patterns: vec![PatternSpec::new("broken", "[", &["x"], "m")],
            ..LiarConfig::default()
        };
        assert!(LiarEngine::new(&config).is_err());
    }
}
