use crate::errors::KernelResult;
use crate::kernel::{FittedModel, IsolationKernel};
use crate::params::KernelParams;
use crate::sampling::CenterSampler;

use log::{debug, info};

/// Fluent configuration for an Isolation Kernel feature map.
///
/// ```
/// use isokernel::builder::IsolationKernelBuilder;
///
/// let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, (i * i) as f64]).collect();
/// let model = IsolationKernelBuilder::new()
///     .with_ensemble_size(8)
///     .with_sample_size(4)
///     .with_seed(42)
///     .fit(&rows)
///     .unwrap();
///
/// assert_eq!(model.n_output_features(), 32);
/// ```
#[derive(Clone, Debug, Default)]
pub struct IsolationKernelBuilder {
    params: KernelParams,
}

impl IsolationKernelBuilder {
    pub fn new() -> Self {
        debug!("Creating IsolationKernelBuilder with default parameters");
        Self::default()
    }

    // -------------------- Ensemble configuration --------------------

    /// Number of independent partitions (T). Default 100.
    pub fn with_ensemble_size(mut self, ensemble_size: usize) -> Self {
        info!("Setting ensemble size: {}", ensemble_size);
        self.params.ensemble_size = ensemble_size;
        self
    }

    /// Centers per partition (ψ). Default 256, clamped to the dataset size at fit time.
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        info!("Setting sample size: {}", sample_size);
        self.params.sample_size = sample_size;
        self
    }

    /// Root seed for center selection. Without it every fit draws fresh centers.
    pub fn with_seed(mut self, seed: u64) -> Self {
        info!("Setting seed: {}", seed);
        self.params.seed = Some(seed);
        self
    }

    /// Replace the whole configuration at once.
    pub fn with_params(mut self, params: KernelParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    // -------------------- Fit --------------------

    pub fn fit(self, reference: &[Vec<f64>]) -> KernelResult<FittedModel> {
        FittedModel::fit(reference, self.params)
    }

    pub fn fit_with_sampler<S: CenterSampler>(
        self,
        reference: &[Vec<f64>],
        sampler: &S,
    ) -> KernelResult<FittedModel> {
        FittedModel::fit_with_sampler(reference, self.params, sampler)
    }

    /// Unfitted estimator carrying this configuration.
    pub fn build(self) -> IsolationKernel {
        IsolationKernel::new(self.params)
    }
}
