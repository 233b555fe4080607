//! Sources of random page indices.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses which 1-based page the sampler fetches next.
///
/// Implementations must return a value in `1..=size`; `size` is always at
/// least 1 when called. Any `FnMut(u64) -> u64` closure is a generator, which
/// is how tests script exact page sequences.
pub trait PageIndexGenerator {
    fn next_page(&mut self, size: u64) -> u64;
}

impl<F> PageIndexGenerator for F
where
    F: FnMut(u64) -> u64,
{
    fn next_page(&mut self, size: u64) -> u64 {
        self(size)
    }
}

/// Uniform draws over `1..=size`, independent on every call
#[derive(Debug, Clone)]
pub struct RandomPageIndex {
    rng: StdRng,
}

impl RandomPageIndex {
    /// Seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPageIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PageIndexGenerator for RandomPageIndex {
    fn next_page(&mut self, size: u64) -> u64 {
        self.rng.random_range(1..=size)
    }
}
