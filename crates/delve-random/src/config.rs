//! Registry seeding configuration.
//!
//! A [`RegistryConfig`] can be embedded in a host's own config file through
//! serde, or read from the environment:
//!
//! - `DELVE_SEED` seeds every stream,
//! - `DELVE_SEED_GAMEPLAY`, `DELVE_SEED_UI`, `DELVE_SEED_COSMETIC` and
//!   `DELVE_SEED_LEVELGEN` override it for one stream.
//!
//! Streams left without a seed draw from system entropy.

use std::collections::BTreeMap;

use delve_core::error::ConfigError;
use delve_core::rng::SeedableSource;
use delve_core::stream::StreamId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::registry::GeneratorRegistry;

/// Environment variable holding the global seed.
pub const SEED_VAR: &str = "DELVE_SEED";

/// Seeds for a [`GeneratorRegistry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Seed for every stream without an entry in `streams`.
    pub seed: Option<u32>,
    /// Per-stream seeds.
    pub streams: BTreeMap<StreamId, u32>,
}

impl RegistryConfig {
    /// A configuration seeding every stream from `seed`.
    #[must_use]
    pub fn seeded(seed: u32) -> Self {
        Self {
            seed: Some(seed),
            streams: BTreeMap::new(),
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeed`] if a seed variable is set but is
    /// not a decimal `u32`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeed`] for a malformed seed value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seed = lookup(SEED_VAR)
            .map(|value| parse_seed(SEED_VAR, &value))
            .transpose()?;
        let mut streams = BTreeMap::new();
        for stream in StreamId::ALL {
            let var = stream_var(stream);
            if let Some(value) = lookup(&var) {
                streams.insert(stream, parse_seed(&var, &value)?);
            }
        }
        Ok(Self { seed, streams })
    }

    /// The seed `stream` resolves to: its own entry, else the global seed.
    #[must_use]
    pub fn seed_for(&self, stream: StreamId) -> Option<u32> {
        self.streams.get(&stream).copied().or(self.seed)
    }

    /// Reseeds every stream of `registry` as configured.
    pub fn apply<S: SeedableSource>(&self, registry: &mut GeneratorRegistry<S>) {
        for stream in StreamId::ALL {
            match self.seed_for(stream) {
                Some(seed) => {
                    registry.seed_with(stream, seed);
                    info!(%stream, seed, "stream seeded from configuration");
                }
                None => {
                    registry.seed(stream);
                    info!(%stream, "stream seeded from entropy");
                }
            }
        }
    }
}

/// The override variable for one stream, e.g. `DELVE_SEED_LEVELGEN`.
#[must_use]
pub fn stream_var(stream: StreamId) -> String {
    let suffix: String = stream
        .as_str()
        .chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    format!("{SEED_VAR}_{suffix}")
}

fn parse_seed(var: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidSeed {
        var: var.to_owned(),
        value: value.to_owned(),
    })
}
