//! # Random Sources
//!
//! Every random decision the altar makes goes through [`RandomSource`], so a
//! test can replay an exact sequence of draws. Production code uses
//! [`ChaChaRandom`], a ChaCha8 stream that is reproducible when seeded.

use std::cmp::Ordering;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of the three kinds of draw the altar needs.
pub trait RandomSource {
    /// Uniform float in `[min, max]`. Returns `min` when the range is empty.
    fn float_between(&mut self, min: f64, max: f64) -> f64;

    /// Uniform integer in `[min, max]`. Returns `min` when the range is empty.
    fn int_between(&mut self, min: u32, max: u32) -> u32;

    /// Uniform index into a collection of `len` elements.
    ///
    /// Returns `None` when `len` is zero.
    fn pick_index(&mut self, len: usize) -> Option<usize>;
}

/// ChaCha8-backed random source.
#[derive(Clone, Debug)]
pub struct ChaChaRandom {
    rng: ChaCha8Rng,
}

impl ChaChaRandom {
    /// Creates a reproducible source from a seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Fills `dest` with random bytes.
    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill(dest);
    }
}

impl RandomSource for ChaChaRandom {
    fn float_between(&mut self, min: f64, max: f64) -> f64 {
        if min.partial_cmp(&max) != Some(Ordering::Less) {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn int_between(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..len))
    }
}
