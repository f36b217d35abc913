//! Delve Core — shared randomness abstractions.
//!
//! This crate defines the bit-source traits, the stream identifiers and the
//! error types that the randomness crates depend on. It contains no
//! probability algorithms.

pub mod error;
pub mod rng;
pub mod stream;

pub use rng::{BitSource, SeedableSource};
pub use stream::StreamId;
