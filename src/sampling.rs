//! Seed derivation and center sampling for the partition ensemble.
//!
//! A single root seed drives a `ChaCha8Rng` that emits one sub-seed per
//! ensemble member, in member order. Each member then draws its centers from
//! its own generator, so members are independent and a refit with the same
//! root seed reproduces every partition bit-for-bit.

use log::{debug, trace};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Strategy for drawing a member's centers from `0..n_samples`.
pub trait CenterSampler {
    /// Draw `amount` distinct indices from `0..n_samples`.
    ///
    /// The returned order is the draw order; it fixes each center's rank (and
    /// column offset) inside the member's block.
    fn draw(&self, n_samples: usize, amount: usize, seed: u64) -> Vec<usize>;
}

/// Uniform sampling without replacement.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformSampler;

impl CenterSampler for UniformSampler {
    fn draw(&self, n_samples: usize, amount: usize, seed: u64) -> Vec<usize> {
        debug_assert!(amount <= n_samples);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let drawn = index::sample(&mut rng, n_samples, amount).into_vec();
        trace!("seed {} -> {} centers", seed, drawn.len());
        drawn
    }
}

/// Resolve the configured seed, drawing a fresh one when none was given.
pub fn resolve_root_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(s) => s,
        None => {
            let s: u64 = rand::random();
            debug!("No seed configured, drew root seed {}", s);
            s
        }
    }
}

/// Derive `ensemble_size` sub-seeds from the root seed, in member order.
pub fn derive_member_seeds(root_seed: u64, ensemble_size: usize) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(root_seed);
    (0..ensemble_size).map(|_| rng.random::<u64>()).collect()
}
