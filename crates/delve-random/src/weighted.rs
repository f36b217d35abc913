//! Weighted and uniform choice.
//!
//! Four shapes of "pick one item in proportion to its weight":
//!
//! - [`choose_weighted`] / [`choose_weighted_entry`] over key-weight
//!   collections (maps, slices of pairs),
//! - [`choose_weighted_index`] over a fixed array of weights,
//! - [`choose_weighted_pairs`] and the [`choose_weighted!`](crate::choose_weighted!)
//!   macro over explicit `(weight, value)` pairs,
//! - [`choose_weighted_by`] over any iterator plus a weight function.
//!
//! The last two stream their input once with O(1) extra state (reservoir
//! sampling of size one), so they work over lazily generated sequences.
//!
//! A total weight of zero yields `None`. Weights are non-negative by
//! contract; negative weights give an unspecified (but memory-safe) result
//! and are not checked for.

use delve_core::rng::BitSource;

use crate::chance::ChanceOperand;
use crate::primitives::{below, int_chance, real_chance};

/// Chooses a key in proportion to its weight from a key-weight collection
/// such as `&HashMap<K, W>` or `&BTreeMap<K, W>`.
///
/// Returns `None` if every weight is zero.
pub fn choose_weighted<'a, R, K, W, I>(rng: &mut R, choices: I) -> Option<&'a K>
where
    R: BitSource + ?Sized,
    K: 'a,
    W: Into<i64> + Copy + 'a,
    I: IntoIterator<Item = (&'a K, &'a W)>,
    I::IntoIter: Clone,
{
    let entries = choices.into_iter();
    let total: i64 = entries.clone().map(|(_, &weight)| weight.into()).sum();
    if total <= 0 {
        return None;
    }
    let roll = below(rng, total.unsigned_abs());
    let mut sum: u64 = 0;
    for (key, &weight) in entries {
        sum += weight.into().unsigned_abs();
        if sum > roll {
            return Some(key);
        }
    }
    None
}

/// [`choose_weighted`] over a slice of `(key, weight)` pairs.
pub fn choose_weighted_entry<'a, R, K, W>(rng: &mut R, choices: &'a [(K, W)]) -> Option<&'a K>
where
    R: BitSource + ?Sized,
    W: Into<i64> + Copy,
{
    choose_weighted(rng, choices.iter().map(|(key, weight)| (key, weight)))
}

/// Chooses an index in proportion to its weight. Entries with weight `<= 0`
/// are skipped entirely.
///
/// Returns `None` if every entry was skipped.
pub fn choose_weighted_index<R, W>(rng: &mut R, weights: &[W]) -> Option<usize>
where
    R: BitSource + ?Sized,
    W: Into<i64> + Copy,
{
    let total: i64 = weights
        .iter()
        .map(|&weight| weight.into())
        .filter(|&weight| weight > 0)
        .sum();
    if total <= 0 {
        return None;
    }
    let roll = below(rng, total.unsigned_abs());
    let mut sum: u64 = 0;
    for (index, &weight) in weights.iter().enumerate() {
        let weight: i64 = weight.into();
        if weight <= 0 {
            continue;
        }
        sum += weight.unsigned_abs();
        if sum > roll {
            return Some(index);
        }
    }
    None
}

/// Running state of a size-one weighted reservoir.
#[derive(Debug, Default)]
struct Reservoir {
    int_total: i64,
    real_total: f64,
}

impl Reservoir {
    /// Adds `weight` to the running total and reports whether the new item
    /// replaces the current pick, which happens with probability
    /// `weight / total`.
    fn offer<R, W>(&mut self, rng: &mut R, weight: W) -> bool
    where
        R: BitSource + ?Sized,
        W: ChanceOperand,
    {
        if W::IS_REAL {
            self.real_total += weight.to_f64();
            real_chance(rng, weight.to_f64(), self.real_total)
        } else {
            self.int_total = self.int_total.saturating_add(weight.to_i64());
            int_chance(rng, weight.to_i64(), self.int_total)
        }
    }
}

/// Chooses a value from `(weight, value)` pairs in a single streaming pass.
///
/// Each value replaces the current pick with probability
/// `weight / running_total`, which gives every value an overall probability
/// proportional to its weight. Returns `None` if every weight is zero.
pub fn choose_weighted_pairs<R, W, T, I>(rng: &mut R, pairs: I) -> Option<T>
where
    R: BitSource + ?Sized,
    W: ChanceOperand,
    I: IntoIterator<Item = (W, T)>,
{
    let mut reservoir = Reservoir::default();
    let mut picked = None;
    for (weight, value) in pairs {
        if reservoir.offer(rng, weight) {
            picked = Some(value);
        }
    }
    picked
}

/// Chooses an item from `items` in proportion to `weight(item)`, in a
/// single forward pass with constant extra memory.
///
/// Returns `None` if the total weight was zero. The iterator is consumed to
/// its end, so it must be finite.
pub fn choose_weighted_by<R, I, F, W>(rng: &mut R, items: I, mut weight: F) -> Option<I::Item>
where
    R: BitSource + ?Sized,
    I: IntoIterator,
    F: FnMut(&I::Item) -> W,
    W: ChanceOperand,
{
    let mut reservoir = Reservoir::default();
    let mut picked = None;
    for item in items {
        let item_weight = weight(&item);
        if reservoir.offer(rng, item_weight) {
            picked = Some(item);
        }
    }
    picked
}

/// Chooses a position from a weight sequence that is known to contain a
/// positive weight.
///
/// # Panics
///
/// Panics if `weights` is empty or all zero; callers use this where that
/// would mean a broken invariant upstream.
pub fn weighted_position<R, W, I>(rng: &mut R, weights: I) -> usize
where
    R: BitSource + ?Sized,
    W: ChanceOperand,
    I: IntoIterator<Item = W>,
{
    let picked = choose_weighted_pairs(rng, weights.into_iter().enumerate().map(|(i, w)| (w, i)));
    assert!(picked.is_some(), "weighted_position: no selectable weight");
    picked.unwrap_or_default()
}

/// Chooses uniformly from a slice; `None` when it is empty.
pub fn choose<'a, R, T>(rng: &mut R, items: &'a [T]) -> Option<&'a T>
where
    R: BitSource + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let index = below(rng, items.len() as u64) as usize;
    items.get(index)
}

/// Chooses uniformly among `first` and `rest`, by value.
pub fn choose_from<R, T, const N: usize>(rng: &mut R, first: T, rest: [T; N]) -> T
where
    R: BitSource + ?Sized,
{
    #[allow(clippy::cast_possible_truncation)]
    let pick = below(rng, N as u64 + 1) as usize;
    match pick.checked_sub(1) {
        Some(index) => rest.into_iter().nth(index).unwrap_or(first),
        None => first,
    }
}

/// Chooses one of the listed values uniformly.
///
/// ```
/// use delve_random::{GeneratorRegistry, choose};
///
/// let mut rng = GeneratorRegistry::with_seed(1);
/// let colour = choose!(&mut rng, "red", "green", "blue");
/// assert!(["red", "green", "blue"].contains(&colour));
/// ```
#[macro_export]
macro_rules! choose {
    ($rng:expr, $first:expr $(, $rest:expr)* $(,)?) => {
        $crate::weighted::choose_from($rng, $first, [$($rest),*])
    };
}

/// Chooses one of the listed values in proportion to its weight, streaming
/// the `weight => value` pairs left to right.
///
/// ```
/// use delve_random::{GeneratorRegistry, choose_weighted};
///
/// let mut rng = GeneratorRegistry::with_seed(1);
/// let loot = choose_weighted!(&mut rng, 10 => "gold", 3 => "gem", 0 => "cursed");
/// assert_ne!(loot, Some("cursed"));
/// ```
#[macro_export]
macro_rules! choose_weighted {
    ($rng:expr, $($weight:expr => $value:expr),+ $(,)?) => {
        $crate::weighted::choose_weighted_pairs($rng, [$(($weight, $value)),+])
    };
}
