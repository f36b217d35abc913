//! Probability primitives.
//!
//! Every primitive is a provided method of [`RandomExt`], which is
//! implemented for all [`BitSource`]s. Degenerate bounds yield degenerate
//! values rather than errors: `random2(0)` is 0 and a chance test with
//! `x <= 0` is false. Inputs outside an operation's domain that can only come
//! from a programming error (`low > high`, zero denominators, zero rolls)
//! panic.

use std::cmp::Ordering;

use delve_core::rng::BitSource;

use crate::chance::{ChanceOperand, uses_real_path};

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Uniform `u32` in `[0, bound)` by rejection sampling; 0 when `bound <= 1`.
pub(crate) fn below_u32<R: BitSource + ?Sized>(rng: &mut R, bound: u32) -> u32 {
    if bound <= 1 {
        return 0;
    }
    let partition = u32::MAX / bound;
    loop {
        let val = rng.next_u32() / partition;
        if val < bound {
            return val;
        }
    }
}

/// Uniform `u64` in `[0, bound)`; 0 when `bound <= 1`.
///
/// Bounds that fit in 32 bits consume 32-bit draws, so small ranges use
/// exactly the same bits whatever integer width the caller works in.
pub(crate) fn below<R: BitSource + ?Sized>(rng: &mut R, bound: u64) -> u64 {
    if let Ok(narrow) = u32::try_from(bound) {
        return u64::from(below_u32(rng, narrow));
    }
    let partition = u64::MAX / bound;
    loop {
        let val = rng.next_u64() / partition;
        if val < bound {
            return val;
        }
    }
}

/// Integer chance test: true with probability `x / y`.
pub(crate) fn int_chance<R: BitSource + ?Sized>(rng: &mut R, x: i64, y: i64) -> bool {
    if x <= 0 {
        return false;
    }
    if x >= y {
        return true;
    }
    // 0 < x < y, so both fit in u64.
    below(rng, y.unsigned_abs()) < x.unsigned_abs()
}

/// Real chance test: true with probability `x / y`.
pub(crate) fn real_chance<R: BitSource + ?Sized>(rng: &mut R, x: f64, y: f64) -> bool {
    if x.is_nan() || x <= 0.0 {
        return false;
    }
    if x >= y {
        return true;
    }
    random_real(rng) * y < x
}

fn random_real<R: BitSource + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.next_u32()) / TWO_POW_32
}

fn widen(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn narrow(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value > 0 { i32::MAX } else { i32::MIN })
}

/// Nearest-integer division, breaking exact halves with a coin flip.
fn div_rand_round_wide<R: BitSource + ?Sized>(rng: &mut R, num: i64, den: i64) -> i64 {
    assert!(den != 0, "div_rand_round: denominator must be non-zero");
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    let quotient = num.div_euclid(den);
    match (2 * num.rem_euclid(den)).cmp(&den) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal => quotient + i64::from(below_u32(rng, 2) == 1),
    }
}

/// Integer division rounding towards positive infinity.
///
/// # Panics
///
/// Panics if `den` is zero.
#[must_use]
pub fn div_round_up(num: i32, den: i32) -> i32 {
    assert!(den != 0, "div_round_up: denominator must be non-zero");
    let quotient = num / den;
    if num % den != 0 && (num < 0) == (den < 0) {
        quotient + 1
    } else {
        quotient
    }
}

/// Probability primitives over any [`BitSource`].
pub trait RandomExt: BitSource {
    /// Uniform integer in `[0, max)`; 0 when `max <= 0`.
    fn random2(&mut self, max: i32) -> i32 {
        match u32::try_from(max) {
            Ok(bound) => narrow(i64::from(below_u32(self, bound))),
            Err(_) => 0,
        }
    }

    /// Uniform integer in `[low, high]`.
    ///
    /// # Panics
    ///
    /// Panics if `low > high`.
    fn random_range(&mut self, low: i32, high: i32) -> i32 {
        assert!(low <= high, "random_range: low {low} exceeds high {high}");
        let span = i64::from(high) - i64::from(low) + 1;
        narrow(i64::from(low) + widen(below(self, span.unsigned_abs())))
    }

    /// Average of `rolls` independent draws from `[low, high]`, rounded to
    /// nearest, concentrating results towards the midpoint.
    ///
    /// # Panics
    ///
    /// Panics if `low > high` or `rolls < 1`.
    fn random_range_avg(&mut self, low: i32, high: i32, rolls: i32) -> i32 {
        assert!(low <= high, "random_range_avg: low {low} exceeds high {high}");
        assert!(rolls >= 1, "random_range_avg: rolls must be positive, got {rolls}");
        let span = (i64::from(high) - i64::from(low) + 1).unsigned_abs();
        let sum: i64 = (0..rolls).map(|_| widen(below(self, span))).sum();
        narrow(i64::from(low) + div_rand_round_wide(self, sum, i64::from(rolls)))
    }

    /// Uniform real in `[0, 1)` from a single 32-bit draw.
    fn random_real(&mut self) -> f64 {
        random_real(self)
    }

    /// Fair coin.
    fn coinflip(&mut self) -> bool {
        below_u32(self, 2) == 1
    }

    /// True with probability `x / y`.
    ///
    /// Always false when `x <= 0` and always true when `x >= y`; neither case
    /// consumes randomness. Mixed operand types are accepted: if either type
    /// is floating point the test compares a random real against the ratio,
    /// otherwise it draws a uniform integer below `y`.
    fn x_chance_in_y<T: ChanceOperand, U: ChanceOperand>(&mut self, x: T, y: U) -> bool {
        if uses_real_path::<T, U>() {
            real_chance(self, x.to_f64(), y.to_f64())
        } else {
            int_chance(self, x.to_i64(), y.to_i64())
        }
    }

    /// True with probability `1 / n`; always true when `n <= 1`.
    fn one_chance_in(&mut self, n: i32) -> bool {
        int_chance(self, 1, i64::from(n))
    }

    /// Truncated average of `rolls` draws, the first from `[0, max)` and the
    /// rest from `[0, max]`.
    ///
    /// # Panics
    ///
    /// Panics if `rolls < 1`.
    fn random2avg(&mut self, max: i32, rolls: i32) -> i32 {
        assert!(rolls >= 1, "random2avg: rolls must be positive, got {rolls}");
        let mut sum = i64::from(self.random2(max));
        for _ in 1..rolls {
            sum += i64::from(self.random2(max.saturating_add(1)));
        }
        narrow(sum / i64::from(rolls))
    }

    /// Integer in `[0, max)` skewed towards 0; larger `n` skews harder.
    ///
    /// Each step `i` stops with probability `n / (n + max)`.
    fn biased_random2(&mut self, max: i32, n: i32) -> i32 {
        let stop = i64::from(n);
        let total = stop + i64::from(max);
        for i in 0..max {
            if int_chance(self, stop, total) {
                return i;
            }
        }
        0
    }

    /// Number of `i` in `[0, max)` for which a draw from `[0, limit)` is at
    /// least `i`; results are capped softly by `limit`.
    fn random2limit(&mut self, max: i32, limit: i32) -> i32 {
        if max < 1 {
            return 0;
        }
        let mut sum = 0;
        for i in 0..max {
            if self.random2(limit) >= i {
                sum += 1;
            }
        }
        sum
    }

    /// Successes over `n_trials` Bernoulli trials of probability
    /// `trial_prob / scale`. Pass a `scale` of 100 for percentages.
    fn binomial(&mut self, n_trials: u32, trial_prob: u32, scale: u32) -> u32 {
        let mut count = 0;
        for _ in 0..n_trials {
            if int_chance(self, i64::from(trial_prob), i64::from(scale)) {
                count += 1;
            }
        }
        count
    }

    /// Whether at least one of `n_trials` trials of probability `trial_prob`
    /// succeeds.
    ///
    /// `n_trials` may be fractional: the failure probability
    /// `(1 - trial_prob) ^ n_trials` interpolates smoothly between the whole
    /// trial counts on either side.
    fn bernoulli(&mut self, n_trials: f64, trial_prob: f64) -> bool {
        if n_trials <= 0.0 || trial_prob <= 0.0 {
            return false;
        }
        let all_fail = (1.0 - trial_prob.min(1.0)).powf(n_trials);
        self.random_real() >= all_fail
    }

    /// Perturbs `val` by an averaged offset spanning `-low_fuzz%` to
    /// `+high_fuzz%` of `val`.
    ///
    /// # Panics
    ///
    /// Panics if `n_average < 1`.
    fn fuzz_value(&mut self, val: i32, low_fuzz: i32, high_fuzz: i32, n_average: i32) -> i32 {
        let low = i64::from(low_fuzz) * i64::from(val) / 100;
        let high = i64::from(high_fuzz) * i64::from(val) / 100;
        let offset = self.random2avg(narrow(low + high + 1), n_average);
        narrow(i64::from(val) + i64::from(offset) - low)
    }

    /// True with probability `percent / 100`; fractional percentages allowed.
    fn decimal_chance(&mut self, percent: f64) -> bool {
        self.random_real() < percent / 100.0
    }

    /// `num / den` rounded to the nearest integer, with exact halves rounded
    /// up or down by a coin flip so repeated calls carry no bias.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    fn div_rand_round(&mut self, num: i32, den: i32) -> i32 {
        narrow(div_rand_round_wide(self, i64::from(num), i64::from(den)))
    }

    /// `x` rounded up with probability equal to its fractional part, so the
    /// expected result equals `x`. Negative values are floored first, so
    /// `-2.25` gives `-3` or `-2` rather than always `-2`.
    #[allow(clippy::cast_possible_truncation)]
    fn rand_round(&mut self, x: f64) -> i32 {
        let whole = x.floor();
        let frac = x - whole;
        (whole as i32).saturating_add(i32::from(self.random_real() < frac))
    }

    /// Sum of `num` dice of `size` faces; 0 when either is non-positive.
    fn roll_dice(&mut self, num: i32, size: i32) -> i32 {
        if num <= 0 || size <= 0 {
            return 0;
        }
        let mut total = i64::from(num);
        for _ in 0..num {
            total += i64::from(self.random2(size));
        }
        narrow(total)
    }

    /// Uniform position in a container of `len` elements, or `None` when it
    /// is empty.
    #[allow(clippy::cast_possible_truncation)]
    fn random_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(below(self, len as u64) as usize)
    }

    /// [`Self::random2`] when `random`, otherwise `max / 2` (0 for
    /// non-positive `max`).
    fn maybe_random2(&mut self, max: i32, random: bool) -> i32 {
        if random {
            self.random2(max)
        } else {
            max.max(0) / 2
        }
    }

    /// `random2(num + den) / den` when `random`, otherwise `num / 2 / den`;
    /// 0 when `num <= 0`.
    ///
    /// # Panics
    ///
    /// Panics if `den <= 0`.
    fn maybe_random_div(&mut self, num: i32, den: i32, random: bool) -> i32 {
        assert!(den > 0, "maybe_random_div: denominator must be positive, got {den}");
        if num <= 0 {
            return 0;
        }
        if random {
            self.random2(num.saturating_add(den)) / den
        } else {
            num / 2 / den
        }
    }

    /// [`Self::roll_dice`] when `random`, otherwise the expected total
    /// `num * (size + 1) / 2` (0 for non-positive inputs).
    fn maybe_roll_dice(&mut self, num: i32, size: i32, random: bool) -> i32 {
        if random {
            self.roll_dice(num, size)
        } else if num <= 0 || size <= 0 {
            0
        } else {
            narrow(i64::from(num) * (i64::from(size) + 1) / 2)
        }
    }
}

impl<R: BitSource + ?Sized> RandomExt for R {}
