//! Bit source abstraction for determinism.
//!
//! In production, this wraps a seeded stream cipher. In tests and replays,
//! a scripted or recorded implementation is injected.

use crate::stream::StreamId;

/// Abstraction over raw bit generation.
///
/// Every call advances the source exactly once. Implementations must be pure
/// functions of their prior state: two sources with equal state produce equal
/// output.
pub trait BitSource {
    /// Generate a uniformly distributed `u32`.
    fn next_u32(&mut self) -> u32;

    /// Generate a uniformly distributed `u64`.
    fn next_u64(&mut self) -> u64;
}

impl<R: BitSource + ?Sized> BitSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }
}

/// A bit source that can be reseeded and snapshotted.
///
/// The three constructors mirror the three ways a stream is (re)seeded:
/// from system entropy, from a scalar, and from an exact state captured
/// earlier with [`SeedableSource::state`].
pub trait SeedableSource: BitSource + Sized {
    /// Opaque exact generator state.
    type State: Clone + std::fmt::Debug + PartialEq;

    /// Creates a source seeded from system entropy for the given stream.
    fn from_entropy(stream: StreamId) -> Self;

    /// Creates a source deterministically seeded from a 32-bit scalar.
    ///
    /// Sources created with the same seed for different streams must produce
    /// independent sequences.
    fn from_seed(seed: u32, stream: StreamId) -> Self;

    /// Recreates a source from a previously captured state.
    fn from_state(state: &Self::State) -> Self;

    /// Captures the exact current state.
    fn state(&self) -> Self::State;
}
