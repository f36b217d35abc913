//! In-place uniform shuffle.

use delve_core::rng::BitSource;

use crate::primitives::below;

/// Fisher–Yates shuffle: for `n` from the length down to 2, swaps the
/// element at a uniform index in `[0, n)` with the one at `n - 1`.
///
/// Linear time, no allocation; every permutation is equally likely.
pub fn shuffle<R, T>(rng: &mut R, items: &mut [T])
where
    R: BitSource + ?Sized,
{
    let mut n = items.len();
    while n > 1 {
        #[allow(clippy::cast_possible_truncation)]
        let i = below(rng, n as u64) as usize;
        n -= 1;
        items.swap(i, n);
    }
}
