//! Dice definitions.

use std::fmt;
use std::str::FromStr;

use delve_core::error::DiceParseError;
use delve_core::rng::BitSource;
use serde::{Deserialize, Serialize};

use crate::primitives::RandomExt;

/// "Roll `count` dice of `faces` sides and sum them."
///
/// Definitions with a non-positive count or face number always roll 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DiceDef {
    /// Number of dice.
    pub count: i32,
    /// Faces per die.
    pub faces: i32,
}

/// 42 one-faced dice: a fixed 42 for effects that must do some damage.
pub const CONVENIENT_NONZERO_DAMAGE: DiceDef = DiceDef::new(42, 1);

impl DiceDef {
    /// Creates a definition.
    #[must_use]
    pub const fn new(count: i32, faces: i32) -> Self {
        Self { count, faces }
    }

    const fn is_live(self) -> bool {
        self.count > 0 && self.faces > 0
    }

    /// Sums `count` independent draws from `[1, faces]`.
    pub fn roll<R: BitSource + ?Sized>(&self, rng: &mut R) -> i32 {
        rng.roll_dice(self.count, self.faces)
    }

    /// Lowest possible roll.
    #[must_use]
    pub const fn min(&self) -> i32 {
        if self.is_live() { self.count } else { 0 }
    }

    /// Highest possible roll.
    #[must_use]
    pub const fn max(&self) -> i32 {
        if self.is_live() {
            self.count.saturating_mul(self.faces)
        } else {
            0
        }
    }

    /// Expected roll.
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.is_live() {
            f64::from(self.count) * (f64::from(self.faces) + 1.0) / 2.0
        } else {
            0.0
        }
    }
}

impl fmt::Display for DiceDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)
    }
}

impl FromStr for DiceDef {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let (count, faces) = input
            .split_once(|c: char| c.eq_ignore_ascii_case(&'d'))
            .ok_or_else(|| DiceParseError::MissingSeparator(input.to_owned()))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| DiceParseError::InvalidNumber {
                    input: input.to_owned(),
                    part: part.to_owned(),
                })
        };
        // "d6" is shorthand for one die.
        let count = if count.trim().is_empty() { 1 } else { parse(count)? };
        Ok(Self::new(count, parse(faces)?))
    }
}

/// Splits `max_damage` across `num_dice` dice so the maximum roll lands on
/// `max_damage` on average.
///
/// The face number is `max_damage / num_dice`, plus one with probability
/// `remainder / num_dice`. A single die carries the whole maximum; when
/// there are more dice than damage, the result is `max_damage` one-faced
/// dice.
pub fn calc_dice<R: BitSource + ?Sized>(rng: &mut R, num_dice: i32, max_damage: i32) -> DiceDef {
    split_damage(num_dice, max_damage, |remainder| {
        rng.x_chance_in_y(remainder, num_dice)
    })
}

/// [`calc_dice`] without randomness: the remainder adds a face when it is
/// at least half of `num_dice`.
#[must_use]
pub fn calc_dice_fixed(num_dice: i32, max_damage: i32) -> DiceDef {
    split_damage(num_dice, max_damage, |remainder| remainder >= num_dice / 2)
}

fn split_damage(num_dice: i32, max_damage: i32, round_up: impl FnOnce(i32) -> bool) -> DiceDef {
    if num_dice <= 1 {
        DiceDef::new(1, max_damage)
    } else if max_damage <= num_dice {
        DiceDef::new(max_damage, 1)
    } else {
        let faces = max_damage / num_dice;
        DiceDef::new(num_dice, faces + i32::from(round_up(max_damage % num_dice)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::GeneratorRegistry;
    use delve_test_support::MockRng;
    use proptest::prelude::*;

    #[test]
    fn test_three_d_six_stays_in_range() {
        let mut rng = GeneratorRegistry::with_seed(60);
        let dice = DiceDef::new(3, 6);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..20_000 {
            let total = dice.roll(&mut rng);
            assert!((3..=18).contains(&total));
            seen_min |= total == 3;
            seen_max |= total == 18;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_non_positive_faces_roll_zero() {
        let mut rng = GeneratorRegistry::with_seed(61);
        assert_eq!(DiceDef::new(3, 0).roll(&mut rng), 0);
        assert_eq!(DiceDef::new(3, -2).roll(&mut rng), 0);
        assert_eq!(DiceDef::new(0, 6).roll(&mut rng), 0);
        assert_eq!(DiceDef::default().max(), 0);
    }

    #[test]
    fn test_calc_dice_one_zero_always_rolls_zero() {
        let mut rng = GeneratorRegistry::with_seed(62);
        let dice = calc_dice(&mut rng, 1, 0);
        for _ in 0..100 {
            assert_eq!(dice.roll(&mut rng), 0);
        }
    }

    #[test]
    fn test_calc_dice_shapes() {
        let mut rng = MockRng;
        assert_eq!(calc_dice(&mut rng, 1, 17), DiceDef::new(1, 17));
        assert_eq!(calc_dice(&mut rng, 0, 9), DiceDef::new(1, 9));
        assert_eq!(calc_dice(&mut rng, 5, 3), DiceDef::new(3, 1));
        assert_eq!(calc_dice(&mut rng, 3, 18), DiceDef::new(3, 6));
    }

    #[test]
    fn test_calc_dice_remainder_adds_face_proportionally() {
        let mut rng = GeneratorRegistry::with_seed(63);
        let mut bumped = 0;
        for _ in 0..10_000 {
            let dice = calc_dice(&mut rng, 4, 21);
            assert_eq!(dice.count, 4);
            match dice.faces {
                5 => {}
                6 => bumped += 1,
                other => panic!("unexpected faces {other}"),
            }
        }
        // Remainder 1 of 4: a quarter of the definitions get the extra face.
        assert!((2_200..2_800).contains(&bumped), "bumped {bumped}");
    }

    #[test]
    fn test_calc_dice_fixed_rounds_half_up() {
        assert_eq!(calc_dice_fixed(4, 21), DiceDef::new(4, 5));
        assert_eq!(calc_dice_fixed(4, 22), DiceDef::new(4, 6));
        assert_eq!(calc_dice_fixed(1, 0), DiceDef::new(1, 0));
    }

    #[test]
    fn test_convenient_nonzero_damage_is_fixed() {
        let mut rng = GeneratorRegistry::with_seed(64);
        assert_eq!(CONVENIENT_NONZERO_DAMAGE.roll(&mut rng), 42);
        assert_eq!(CONVENIENT_NONZERO_DAMAGE.min(), CONVENIENT_NONZERO_DAMAGE.max());
    }

    #[test]
    fn test_bounds_and_average() {
        let dice = DiceDef::new(2, 8);
        assert_eq!(dice.min(), 2);
        assert_eq!(dice.max(), 16);
        assert!((dice.average() - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("3d6".parse::<DiceDef>().unwrap(), DiceDef::new(3, 6));
        assert_eq!(" 2D10 ".parse::<DiceDef>().unwrap(), DiceDef::new(2, 10));
        assert_eq!("d20".parse::<DiceDef>().unwrap(), DiceDef::new(1, 20));
        assert_eq!(DiceDef::new(4, 12).to_string(), "4d12");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "3x6".parse::<DiceDef>().unwrap_err(),
            DiceParseError::MissingSeparator("3x6".to_owned())
        );
        assert!(matches!(
            "3dfoo".parse::<DiceDef>(),
            Err(DiceParseError::InvalidNumber { part, .. }) if part == "foo"
        ));
    }

    proptest! {
        #[test]
        fn prop_roll_within_bounds(seed: u32, count in 0i32..20, faces in -2i32..30) {
            let mut rng = GeneratorRegistry::with_seed(seed);
            let dice = DiceDef::new(count, faces);
            let total = dice.roll(&mut rng);
            prop_assert!(total >= dice.min());
            prop_assert!(total <= dice.max());
        }

        #[test]
        fn prop_calc_dice_max_brackets_target(seed: u32, num_dice in 2i32..10, max_damage in 0i32..200) {
            let mut rng = GeneratorRegistry::with_seed(seed);
            let dice = calc_dice(&mut rng, num_dice, max_damage);
            prop_assert!(dice.max() <= max_damage + num_dice);
            prop_assert!(dice.max() + num_dice > max_damage);
        }
    }
}
