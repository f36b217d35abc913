//! Generator registry: one independent bit source per stream.

use delve_core::rng::{BitSource, SeedableSource};
use delve_core::stream::StreamId;
use tracing::debug;

use crate::config::RegistryConfig;
use crate::primitives::RandomExt;
use crate::source::ChaChaSource;

/// Owns the generator state of every [`StreamId`].
///
/// The registry is an explicit object rather than process-global state so
/// that tests and parallel simulations each get an isolated set of streams.
/// It implements [`BitSource`] by drawing from the gameplay stream, which
/// makes gameplay the default for every primitive called directly on it.
#[derive(Debug, Clone)]
pub struct GeneratorRegistry<S: SeedableSource = ChaChaSource> {
    sources: [S; StreamId::COUNT],
    seeds: [Option<u32>; StreamId::COUNT],
}

impl GeneratorRegistry {
    /// Creates a registry with every stream seeded from system entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::from_entropy()
    }

    /// Creates a registry with every stream seeded from `seed`.
    #[must_use]
    pub fn with_seed(seed: u32) -> Self {
        Self::from_scalar(seed)
    }

    /// Creates a registry seeded as described by `config`.
    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Self {
        let mut registry = Self::from_entropy();
        config.apply(&mut registry);
        registry
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SeedableSource> GeneratorRegistry<S> {
    /// Creates a registry of `S` sources seeded from system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            sources: StreamId::ALL.map(S::from_entropy),
            seeds: [None; StreamId::COUNT],
        }
    }

    /// Creates a registry of `S` sources all seeded from `seed`.
    #[must_use]
    pub fn from_scalar(seed: u32) -> Self {
        Self {
            sources: StreamId::ALL.map(|stream| S::from_seed(seed, stream)),
            seeds: [Some(seed); StreamId::COUNT],
        }
    }

    /// Reseeds one stream from system entropy.
    pub fn seed(&mut self, stream: StreamId) {
        self.sources[stream.index()] = S::from_entropy(stream);
        self.seeds[stream.index()] = None;
        debug!(%stream, "reseeded stream from entropy");
    }

    /// Reseeds one stream deterministically from a 32-bit scalar.
    pub fn seed_with(&mut self, stream: StreamId, seed: u32) {
        self.sources[stream.index()] = S::from_seed(seed, stream);
        self.seeds[stream.index()] = Some(seed);
        debug!(%stream, seed, "reseeded stream");
    }

    /// Reseeds every stream from the same scalar.
    pub fn seed_all(&mut self, seed: u32) {
        for stream in StreamId::ALL {
            self.seed_with(stream, seed);
        }
    }

    /// Restores one stream to an exact state captured with [`Self::state`].
    pub fn restore(&mut self, stream: StreamId, state: &S::State) {
        self.sources[stream.index()] = S::from_state(state);
        self.seeds[stream.index()] = None;
        debug!(%stream, "restored stream state");
    }

    /// Captures the exact state of one stream.
    #[must_use]
    pub fn state(&self, stream: StreamId) -> S::State {
        self.sources[stream.index()].state()
    }

    /// The scalar a stream was last seeded with, if it was seeded from one.
    #[must_use]
    pub fn seed_of(&self, stream: StreamId) -> Option<u32> {
        self.seeds[stream.index()]
    }

    /// Mutable access to one stream's source.
    pub fn stream(&mut self, stream: StreamId) -> &mut S {
        &mut self.sources[stream.index()]
    }

    /// The gameplay stream.
    pub fn gameplay(&mut self) -> &mut S {
        self.stream(StreamId::Gameplay)
    }

    /// The UI stream.
    pub fn ui(&mut self) -> &mut S {
        self.stream(StreamId::Ui)
    }

    /// Uniform integer in `[0, max)` drawn from the UI stream.
    pub fn ui_random(&mut self, max: i32) -> i32 {
        self.ui().random2(max)
    }
}

impl<S: SeedableSource> BitSource for GeneratorRegistry<S> {
    fn next_u32(&mut self) -> u32 {
        self.gameplay().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.gameplay().next_u64()
    }
}
