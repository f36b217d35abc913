//! Shared helpers for randomness integration tests.
#![allow(dead_code)]

use delve_random::{BitSource, GeneratorRegistry};

/// Seed shared by tests that only need some fixed seed.
pub const SEED: u32 = 0x00DE_17E5;

/// A registry with every stream seeded from [`SEED`].
pub fn seeded_registry() -> GeneratorRegistry {
    GeneratorRegistry::with_seed(SEED)
}

/// Draws `n` raw words.
pub fn raw_draws<R: BitSource + ?Sized>(source: &mut R, n: usize) -> Vec<u32> {
    (0..n).map(|_| source.next_u32()).collect()
}

/// Observed frequency of each value in `0..buckets` over `trials` calls of
/// `draw`.
pub fn frequencies(buckets: usize, trials: u32, mut draw: impl FnMut() -> usize) -> Vec<f64> {
    let mut counts = vec![0u32; buckets];
    for _ in 0..trials {
        counts[draw()] += 1;
    }
    counts
        .into_iter()
        .map(|count| f64::from(count) / f64::from(trials))
        .collect()
}

/// Asserts `observed` is within `tolerance` of `expected`.
pub fn assert_close(observed: f64, expected: f64, tolerance: f64) {
    assert!(
        (observed - expected).abs() <= tolerance,
        "observed {observed}, expected {expected} +/- {tolerance}"
    );
}
