//! Seeded random source shared by every draw within one run.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Explicitly passed random source. The population and every sample of a
/// run are drawn from the same stream, so a seed fully determines a run.
#[derive(Clone, Debug)]
pub struct SimulationRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl SimulationRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SimulationRng {
    fn default() -> Self {
        Self::new(42)
    }
}

impl RngCore for SimulationRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
