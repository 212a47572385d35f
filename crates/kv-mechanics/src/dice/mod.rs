//! Dice sources.
//!
//! A [`DiceSource`] produces one face at a time. The seeded `StdRng` is the
//! production source. [`FixedDice`] replays a scripted sequence.

pub mod fixed;

pub use fixed::FixedDice;

use rand::Rng;
use rand::rngs::StdRng;

/// Number of faces on the check die.
pub const CHECK_DIE_SIDES: u32 = 10;

/// Anything that can roll a die.
pub trait DiceSource {
    /// Roll one die with `sides` faces, returning a value in `1..=sides`.
    fn roll(&mut self, sides: u32) -> u32;
}

impl DiceSource for StdRng {
    fn roll(&mut self, sides: u32) -> u32 {
        self.random_range(1..=sides.max(1))
    }
}

impl<D: DiceSource + ?Sized> DiceSource for &mut D {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn rng_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let v = rng.roll(CHECK_DIE_SIDES);
            assert!((1..=10).contains(&v));
        }
    }

    #[test]
    fn rng_deterministic_with_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(a.roll(10), b.roll(10));
        }
    }
}
