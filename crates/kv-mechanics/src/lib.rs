//! Game mechanics for Kaltvik.
//!
//! Provides the 2d10 skill check resolver with its critical rules, the
//! difficulty ladder, the four-category skill taxonomy with a character
//! skill sheet, and the dice sources that feed checks. Randomness is always
//! injected through [`DiceSource`] so callers and tests control it.

/// Skill check resolution and difficulty labels.
pub mod check;
/// Dice sources.
pub mod dice;
/// Error types for the mechanics engine.
pub mod error;
/// Skill taxonomy and character skill sheets.
pub mod skill;

pub use check::{CheckOutcome, Difficulty, difficulty_label, roll_check};
pub use dice::{DiceSource, FixedDice};
pub use error::{MechError, MechResult};
pub use skill::{Skill, SkillCategory, SkillSheet};
