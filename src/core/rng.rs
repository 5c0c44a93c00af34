//! Deterministic game randomness.
//!
//! A real game owns one `GameRng` stream. When a state is copied into
//! hypothetical mode the stream is replaced by a simulation stream derived
//! only from a caller-chosen salt, so lookahead never reads or advances the
//! real sequence and cannot reveal what the real deck will produce.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SIMULATION_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    simulation: bool,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            simulation: false,
        }
    }

    /// A stream for hypothetical play. Independent of any real seed.
    #[must_use]
    pub fn simulation(salt: u64) -> Self {
        let seed = salt.wrapping_mul(SIMULATION_MIX) ^ SIMULATION_MIX;
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            simulation: true,
        }
    }

    #[must_use]
    pub fn is_simulation(&self) -> bool {
        self.simulation
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}
