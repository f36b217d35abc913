//! Test RNGs — deterministic `BitSource` implementations for tests.

use delve_core::rng::BitSource;

/// A bit source that always returns zero. Every uniform draw therefore
/// lands on its lowest value and every non-degenerate chance test succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockRng;

impl BitSource for MockRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }
}

/// A bit source that returns values from a predetermined sequence. Panics if
/// the sequence is exhausted. Used in tests that need specific raw words
/// (e.g., to drive rejection sampling or deferred-tree refinement).
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    /// Number of values not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len() - self.index
    }
}

impl BitSource for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        let val = self.values[self.index];
        self.index += 1;
        val
    }

    /// Consumes two values, high word first.
    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }
}

/// Wraps another bit source and counts how many draws pass through it.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    inner: R,
    draws: usize,
}

impl<R: BitSource> CountingRng<R> {
    /// Wrap `inner` with a zeroed counter.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self { inner, draws: 0 }
    }

    /// Total `next_u32` and `next_u64` calls so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Unwrap the inner source.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BitSource> BitSource for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.inner.next_u64()
    }
}
