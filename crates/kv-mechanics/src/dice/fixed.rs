//! Scripted dice for deterministic checks.

use super::DiceSource;
use crate::error::{MechError, MechResult};

/// Replays a fixed sequence of faces, cycling when exhausted.
///
/// Faces are clamped into `1..=sides` at roll time. An empty sequence
/// always rolls 1.
#[derive(Debug, Clone, Default)]
pub struct FixedDice {
    faces: Vec<u32>,
    cursor: usize,
}

impl FixedDice {
    /// Create from a list of faces.
    pub fn new(faces: Vec<u32>) -> Self {
        Self { faces, cursor: 0 }
    }

    /// Parse a comma-separated sequence such as `"10,10"` or `"3, 4"`.
    pub fn parse(s: &str) -> MechResult<Self> {
        let faces = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>()
                    .ok()
                    .filter(|&n| n >= 1)
                    .ok_or_else(|| MechError::InvalidDice(s.to_string()))
            })
            .collect::<MechResult<Vec<u32>>>()?;
        if faces.is_empty() {
            return Err(MechError::InvalidDice(s.to_string()));
        }
        Ok(Self::new(faces))
    }

    /// The scripted faces.
    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    /// How many faces have been consumed.
    pub fn rolled(&self) -> usize {
        self.cursor
    }
}

impl DiceSource for FixedDice {
    fn roll(&mut self, sides: u32) -> u32 {
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face.clamp(1, sides.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rolls<D: DiceSource>(mut dice: D) -> (u32, u32) {
        (dice.roll(10), dice.roll(10))
    }

    #[test]
    fn replays_in_order_and_cycles() {
        let mut dice = FixedDice::new(vec![3, 4]);
        assert_eq!(dice.roll(10), 3);
        assert_eq!(dice.roll(10), 4);
        assert_eq!(dice.roll(10), 3);
        assert_eq!(dice.rolled(), 3);
    }

    #[test]
    fn clamps_to_sides() {
        let mut dice = FixedDice::new(vec![15]);
        assert_eq!(dice.roll(10), 10);
    }

    #[test]
    fn empty_rolls_one() {
        let mut dice = FixedDice::default();
        assert_eq!(dice.roll(10), 1);
    }

    #[test]
    fn usable_through_mut_ref() {
        let mut dice = FixedDice::new(vec![1, 1]);
        assert_eq!(two_rolls(&mut dice), (1, 1));
        assert_eq!(dice.rolled(), 2);
    }

    #[test]
    fn parse_sequence() {
        let mut dice = FixedDice::parse("10, 10").unwrap();
        assert_eq!(two_rolls(&mut dice), (10, 10));
        assert!(FixedDice::parse("").is_err());
        assert!(FixedDice::parse("3,x").is_err());
        assert!(FixedDice::parse("0").is_err());
    }
}
