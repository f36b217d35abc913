//! ChaCha-backed bit source.

use delve_core::rng::{BitSource, SeedableSource};
use delve_core::stream::StreamId;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of words in an exported [`ChaChaState`].
pub const STATE_WORDS: usize = 7;

/// Exact generator state: four key words, the 128-bit word position split
/// high/low, then the stream number.
pub type ChaChaState = [u64; STATE_WORDS];

/// Production bit source wrapping `ChaCha8Rng`.
///
/// Each [`StreamId`] selects a distinct ChaCha stream, so two streams seeded
/// from the same scalar still produce unrelated sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaChaSource {
    inner: ChaCha8Rng,
}

impl ChaChaSource {
    fn with_stream(mut inner: ChaCha8Rng, stream: StreamId) -> Self {
        inner.set_stream(stream.index() as u64);
        Self { inner }
    }
}

impl BitSource for ChaChaSource {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

impl SeedableSource for ChaChaSource {
    type State = ChaChaState;

    fn from_entropy(stream: StreamId) -> Self {
        Self::with_stream(ChaCha8Rng::from_rng(&mut rand::rng()), stream)
    }

    fn from_seed(seed: u32, stream: StreamId) -> Self {
        Self::with_stream(ChaCha8Rng::seed_from_u64(u64::from(seed)), stream)
    }

    fn from_state(state: &ChaChaState) -> Self {
        let mut key = [0u8; 32];
        for (chunk, word) in key.chunks_exact_mut(8).zip(&state[..4]) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        let mut inner = ChaCha8Rng::from_seed(key);
        inner.set_stream(state[6]);
        inner.set_word_pos((u128::from(state[4]) << 64) | u128::from(state[5]));
        Self { inner }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn state(&self) -> ChaChaState {
        let key = self.inner.get_seed();
        let mut state = [0u64; STATE_WORDS];
        for (word, chunk) in state.iter_mut().zip(key.chunks_exact(8)) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            *word = u64::from_le_bytes(bytes);
        }
        let word_pos = self.inner.get_word_pos();
        state[4] = (word_pos >> 64) as u64;
        state[5] = word_pos as u64;
        state[6] = self.inner.get_stream();
        state
    }
}
