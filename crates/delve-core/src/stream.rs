//! Stream identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Names an independent randomness domain.
///
/// Draws from one stream never perturb the state of another, so cosmetic
/// or interface randomness cannot desynchronize a replay of gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamId {
    /// Everything that affects the simulation outcome.
    Gameplay,
    /// Interface-only randomness (tips, menu flavour).
    Ui,
    /// Presentation randomness that may differ between builds or platforms.
    Cosmetic,
    /// Level generation, kept apart so layouts survive gameplay changes.
    LevelGen,
}

impl StreamId {
    /// Number of streams.
    pub const COUNT: usize = 4;

    /// All streams, in index order.
    pub const ALL: [StreamId; Self::COUNT] = [
        StreamId::Gameplay,
        StreamId::Ui,
        StreamId::Cosmetic,
        StreamId::LevelGen,
    ];

    /// Dense index of this stream, in `0..COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            StreamId::Gameplay => 0,
            StreamId::Ui => 1,
            StreamId::Cosmetic => 2,
            StreamId::LevelGen => 3,
        }
    }

    /// Stable lowercase name, as used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StreamId::Gameplay => "gameplay",
            StreamId::Ui => "ui",
            StreamId::Cosmetic => "cosmetic",
            StreamId::LevelGen => "level_gen",
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamId {
    type Err = crate::error::UnknownStream;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StreamId::ALL
            .into_iter()
            .find(|stream| stream.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::error::UnknownStream(s.to_owned()))
    }
}
