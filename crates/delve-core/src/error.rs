//! Error types.
//!
//! Probability operations never fail; these cover the edges where text or
//! configuration enters the system.

use thiserror::Error;

/// A stream name that does not match any [`StreamId`](crate::StreamId).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stream: {0}")]
pub struct UnknownStream(pub String);

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A seed variable was present but not a valid 32-bit unsigned integer.
    #[error("{var} must be a valid u32 seed, got {value:?}")]
    InvalidSeed {
        /// The environment variable or config key.
        var: String,
        /// The rejected value.
        value: String,
    },

    /// A numeric setting was present but malformed.
    #[error("{var} is invalid: {reason}")]
    InvalidSetting {
        /// The environment variable or config key.
        var: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Dice notation parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The text has no `d` separator.
    #[error("dice notation must look like NdS, got {0:?}")]
    MissingSeparator(String),

    /// The count or face part is not an integer.
    #[error("invalid number {part:?} in dice notation {input:?}")]
    InvalidNumber {
        /// The whole input.
        input: String,
        /// The offending part.
        part: String,
    },
}
