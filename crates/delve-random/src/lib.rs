//! Delve Random — the randomness subsystem of the simulation.
//!
//! Responsible for independently seeded streams, the probability primitives
//! built on raw bits, weighted choice, dice, shuffling, and deferred random
//! trees whose answers stay stable no matter how they are later queried.
//!
//! Every primitive is a method of [`RandomExt`], which is implemented for
//! every [`BitSource`]. The [`GeneratorRegistry`] is itself a bit source
//! that draws from the gameplay stream, so
//! `registry.random2(6)` rolls on gameplay and
//! `registry.stream(StreamId::Ui).random2(6)` rolls on the UI stream.

pub mod chance;
pub mod config;
pub mod deferred;
pub mod dice;
pub mod primitives;
pub mod registry;
pub mod shuffle;
pub mod source;
pub mod weighted;

pub use chance::ChanceOperand;
pub use config::RegistryConfig;
pub use deferred::{DeferredTree, NodeId};
pub use delve_core::{BitSource, SeedableSource, StreamId};
pub use dice::{CONVENIENT_NONZERO_DAMAGE, DiceDef, calc_dice, calc_dice_fixed};
pub use primitives::{RandomExt, div_round_up};
pub use registry::GeneratorRegistry;
pub use shuffle::shuffle;
pub use source::{ChaChaSource, ChaChaState};
pub use weighted::{
    choose, choose_from, choose_weighted, choose_weighted_by, choose_weighted_entry,
    choose_weighted_index, choose_weighted_pairs, weighted_position,
};
