use serde::{Deserialize, Serialize};

use crate::errors::{KernelError, KernelResult};

pub const DEFAULT_ENSEMBLE_SIZE: usize = 100;
pub const DEFAULT_SAMPLE_SIZE: usize = 256;

/// Ensemble configuration, fixed once a model is fitted.
///
/// - `ensemble_size`: number of independent Voronoi partitions (T), one block
///   of output columns each
/// - `sample_size`: centers per partition (ψ), clamped to the number of
///   reference points at fit time
/// - `seed`: root seed for center selection; `None` draws one at fit time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelParams {
    pub ensemble_size: usize,
    pub sample_size: usize,
    pub seed: Option<u64>,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            ensemble_size: DEFAULT_ENSEMBLE_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: None,
        }
    }
}

impl KernelParams {
    pub fn new(ensemble_size: usize, sample_size: usize, seed: Option<u64>) -> Self {
        Self {
            ensemble_size,
            sample_size,
            seed,
        }
    }

    pub fn validate(&self) -> KernelResult<()> {
        if self.ensemble_size == 0 {
            return Err(KernelError::Validation(
                "ensemble_size must be at least 1".to_string(),
            ));
        }
        if self.sample_size == 0 {
            return Err(KernelError::Validation(
                "sample_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// ψ_eff = min(ψ, n)
    #[inline]
    pub fn effective_sample_size(&self, n_samples: usize) -> usize {
        self.sample_size.min(n_samples)
    }
}
