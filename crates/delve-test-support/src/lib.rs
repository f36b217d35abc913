//! Shared test doubles and utilities for the Delve randomness core.

mod rng;

pub use rng::{CountingRng, MockRng, SequenceRng};
