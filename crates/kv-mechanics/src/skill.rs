//! Skill taxonomy and character skill sheets.
//!
//! Twenty-nine skills in four categories. The category only groups skills
//! for display; it has no mechanical effect.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::check::{CheckOutcome, roll_check};
use crate::dice::DiceSource;
use crate::error::{MechError, MechResult};

/// Highest level a character skill can reach.
pub const MAX_SKILL_LEVEL: i32 = 6;

/// Display grouping for skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    /// Analytical skills.
    Reason,
    /// Perceptive and instinctive skills.
    Intuition,
    /// Physical skills.
    Constitution,
    /// Social skills.
    Presence,
}

impl SkillCategory {
    /// All categories in display order.
    pub const ALL: [SkillCategory; 4] = [
        Self::Reason,
        Self::Intuition,
        Self::Constitution,
        Self::Presence,
    ];

    /// Skills belonging to this category.
    pub fn skills(self) -> impl Iterator<Item = Skill> {
        Skill::ALL.into_iter().filter(move |s| s.category() == self)
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reason => write!(f, "Reason"),
            Self::Intuition => write!(f, "Intuition"),
            Self::Constitution => write!(f, "Constitution"),
            Self::Presence => write!(f, "Presence"),
        }
    }
}

/// A skill from the fixed taxonomy.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    Logic,
    Forensics,
    Research,
    Skepticism,
    Medicine,
    Technology,
    OccultKnowledge,
    PatternRecognition,
    ParanormalSensitivity,
    Profiling,
    Instinct,
    Subconscious,
    Manipulation,
    Perception,
    Endurance,
    Fortitude,
    Firearms,
    Athletics,
    Stealth,
    Reflexes,
    Survival,
    HandToHandCombat,
    Authority,
    Charm,
    Wits,
    Composure,
    Empathy,
    Interrogation,
    Deception,
}

impl Skill {
    /// Every skill, grouped by category.
    pub const ALL: [Skill; 29] = [
        Self::Logic,
        Self::Forensics,
        Self::Research,
        Self::Skepticism,
        Self::Medicine,
        Self::Technology,
        Self::OccultKnowledge,
        Self::PatternRecognition,
        Self::ParanormalSensitivity,
        Self::Profiling,
        Self::Instinct,
        Self::Subconscious,
        Self::Manipulation,
        Self::Perception,
        Self::Endurance,
        Self::Fortitude,
        Self::Firearms,
        Self::Athletics,
        Self::Stealth,
        Self::Reflexes,
        Self::Survival,
        Self::HandToHandCombat,
        Self::Authority,
        Self::Charm,
        Self::Wits,
        Self::Composure,
        Self::Empathy,
        Self::Interrogation,
        Self::Deception,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Logic => "Logic",
            Self::Forensics => "Forensics",
            Self::Research => "Research",
            Self::Skepticism => "Skepticism",
            Self::Medicine => "Medicine",
            Self::Technology => "Technology",
            Self::OccultKnowledge => "Occult Knowledge",
            Self::PatternRecognition => "Pattern Recognition",
            Self::ParanormalSensitivity => "Paranormal Sensitivity",
            Self::Profiling => "Profiling",
            Self::Instinct => "Instinct",
            Self::Subconscious => "Subconscious",
            Self::Manipulation => "Manipulation",
            Self::Perception => "Perception",
            Self::Endurance => "Endurance",
            Self::Fortitude => "Fortitude",
            Self::Firearms => "Firearms",
            Self::Athletics => "Athletics",
            Self::Stealth => "Stealth",
            Self::Reflexes => "Reflexes",
            Self::Survival => "Survival",
            Self::HandToHandCombat => "Hand-to-Hand Combat",
            Self::Authority => "Authority",
            Self::Charm => "Charm",
            Self::Wits => "Wits",
            Self::Composure => "Composure",
            Self::Empathy => "Empathy",
            Self::Interrogation => "Interrogation",
            Self::Deception => "Deception",
        }
    }

    /// The category this skill is listed under.
    pub fn category(self) -> SkillCategory {
        use Skill::*;
        match self {
            Logic | Forensics | Research | Skepticism | Medicine | Technology
            | OccultKnowledge => SkillCategory::Reason,
            PatternRecognition | ParanormalSensitivity | Profiling | Instinct | Subconscious
            | Manipulation | Perception => SkillCategory::Intuition,
            Endurance | Fortitude | Firearms | Athletics | Stealth | Reflexes | Survival
            | HandToHandCombat => SkillCategory::Constitution,
            Authority | Charm | Wits | Composure | Empathy | Interrogation | Deception => {
                SkillCategory::Presence
            }
        }
    }

    /// Parse a skill name, ignoring case, spaces, `_` and `-`.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = squash(s);
        Self::ALL.into_iter().find(|skill| squash(skill.name()) == wanted)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A character's skill levels.
///
/// Unlisted skills are level 0. Levels are clamped to `0..=6`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSheet {
    levels: BTreeMap<Skill, i32>,
}

impl SkillSheet {
    /// An empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a level (builder style).
    pub fn with(mut self, skill: Skill, level: i32) -> Self {
        self.set(skill, level);
        self
    }

    /// Set a level, clamping to the valid range.
    pub fn set(&mut self, skill: Skill, level: i32) {
        self.levels.insert(skill, level.clamp(0, MAX_SKILL_LEVEL));
    }

    /// Set a level by skill name.
    pub fn set_by_name(&mut self, name: &str, level: i32) -> MechResult<Skill> {
        let skill = Skill::parse(name).ok_or_else(|| MechError::UnknownSkill(name.to_string()))?;
        self.set(skill, level);
        Ok(skill)
    }

    /// Adjust a level by a signed amount, clamping the result.
    pub fn improve(&mut self, skill: Skill, delta: i32) -> i32 {
        let level = (self.level(skill) + delta).clamp(0, MAX_SKILL_LEVEL);
        self.levels.insert(skill, level);
        level
    }

    /// Current level.
    pub fn level(&self, skill: Skill) -> i32 {
        self.levels.get(&skill).copied().unwrap_or(0)
    }

    /// Roll a check with this sheet's level in `skill`.
    pub fn check<D: DiceSource + ?Sized>(
        &self,
        skill: Skill,
        difficulty: i32,
        dice: &mut D,
    ) -> CheckOutcome {
        roll_check(self.level(skill), difficulty, dice)
    }

    /// Every skill with its level, grouped by category.
    pub fn by_category(&self) -> Vec<(SkillCategory, Vec<(Skill, i32)>)> {
        SkillCategory::ALL
            .into_iter()
            .map(|cat| (cat, cat.skills().map(|s| (s, self.level(s))).collect()))
            .collect()
    }

    /// Non-zero levels keyed by display name.
    pub fn named_levels(&self) -> BTreeMap<String, i32> {
        self.levels
            .iter()
            .filter(|(_, level)| **level > 0)
            .map(|(skill, level)| (skill.name().to_string(), *level))
            .collect()
    }
}
