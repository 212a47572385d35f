//! The 2d10 skill check.
//!
//! Two ten-sided dice are added to the skill level and compared against a
//! difficulty. Double tens always succeed and double ones always fail,
//! whatever the total.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dice::{CHECK_DIE_SIDES, DiceSource};

/// Highest skill level accepted by an ad-hoc check.
pub const MAX_CHECK_LEVEL: i32 = 10;

/// Named rungs of the difficulty ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// 6 or less.
    Trivial,
    /// 7–10.
    Easy,
    /// 11–12.
    Medium,
    /// 13–14.
    Challenging,
    /// 15–16.
    Formidable,
    /// 17–18.
    Impossible,
    /// 19 and up.
    Godly,
}

impl Difficulty {
    /// Classify a numeric difficulty.
    pub fn from_value(difficulty: i32) -> Self {
        match difficulty {
            ..=6 => Self::Trivial,
            7..=10 => Self::Easy,
            11..=12 => Self::Medium,
            13..=14 => Self::Challenging,
            15..=16 => Self::Formidable,
            17..=18 => Self::Impossible,
            _ => Self::Godly,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trivial => "Trivial",
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Challenging => "Challenging",
            Self::Formidable => "Formidable",
            Self::Impossible => "Impossible",
            Self::Godly => "Godly",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map an integer difficulty to its label.
pub fn difficulty_label(difficulty: i32) -> &'static str {
    Difficulty::from_value(difficulty).label()
}

/// The full record of one skill check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Whether the check succeeded.
    pub success: bool,
    /// Dice plus skill level.
    pub total: i32,
    /// Sum of the two dice.
    pub natural_roll: i32,
    /// First die face.
    pub die1: u32,
    /// Second die face.
    pub die2: u32,
    /// Skill level used, after clamping.
    pub skill_level: i32,
    /// Target number.
    pub difficulty: i32,
}

impl CheckOutcome {
    /// `total - difficulty`. Negative on a miss.
    pub fn margin(&self) -> i32 {
        self.total - self.difficulty
    }

    /// Double tens.
    pub fn is_critical_success(&self) -> bool {
        self.die1 == CHECK_DIE_SIDES && self.die2 == CHECK_DIE_SIDES
    }

    /// Double ones.
    pub fn is_critical_failure(&self) -> bool {
        self.die1 == 1 && self.die2 == 1
    }

    /// Either critical.
    pub fn is_critical(&self) -> bool {
        self.is_critical_success() || self.is_critical_failure()
    }

    /// Difficulty rung of this check.
    pub fn difficulty_rung(&self) -> Difficulty {
        Difficulty::from_value(self.difficulty)
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match (self.success, self.is_critical()) {
            (true, true) => "CRITICAL SUCCESS",
            (true, false) => "SUCCESS",
            (false, true) => "CRITICAL FAILURE",
            (false, false) => "FAILURE",
        };
        write!(
            f,
            "{verdict}: [{}+{}] + {} = {} vs {} ({})",
            self.die1,
            self.die2,
            self.skill_level,
            self.total,
            self.difficulty,
            self.difficulty_rung()
        )
    }
}

/// Roll a 2d10 check of `skill_level` against `difficulty`.
///
/// The skill level is clamped to `0..=10`. Rules, in order: double tens
/// succeed, double ones fail, otherwise `total >= difficulty`.
pub fn roll_check<D: DiceSource + ?Sized>(
    skill_level: i32,
    difficulty: i32,
    dice: &mut D,
) -> CheckOutcome {
    let skill_level = skill_level.clamp(0, MAX_CHECK_LEVEL);
    let die1 = dice.roll(CHECK_DIE_SIDES);
    let die2 = dice.roll(CHECK_DIE_SIDES);
    let natural_roll = (die1 + die2) as i32;
    let total = natural_roll + skill_level;

    let success = if die1 == CHECK_DIE_SIDES && die2 == CHECK_DIE_SIDES {
        true
    } else if die1 == 1 && die2 == 1 {
        false
    } else {
        total >= difficulty
    };

    let outcome = CheckOutcome {
        success,
        total,
        natural_roll,
        die1,
        die2,
        skill_level,
        difficulty,
    };
    debug!(%outcome, "skill check");
    outcome
}
