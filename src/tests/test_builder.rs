use crate::builder::IsolationKernelBuilder;
use crate::errors::KernelError;
use crate::params::KernelParams;
use crate::sampling::CenterSampler;
use crate::tests::test_data::{line_2d, spiral};

#[test]
fn test_builder_defaults() {
    let builder = IsolationKernelBuilder::new();
    assert_eq!(*builder.params(), KernelParams::default());
}

#[test]
fn test_builder_fit() {
    let rows = spiral(64, 4);
    let model = IsolationKernelBuilder::new()
        .with_ensemble_size(20)
        .with_sample_size(16)
        .with_seed(99)
        .fit(&rows)
        .unwrap();

    assert_eq!(model.ensemble_size(), 20);
    assert_eq!(model.max_samples(), 16);
    assert_eq!(model.n_features(), 4);
    assert_eq!(model.n_output_features(), 320);
    assert_eq!(model.seed(), Some(99));
}

#[test]
fn test_builder_with_params_overrides() {
    let params = KernelParams::new(3, 2, Some(1));
    let builder = IsolationKernelBuilder::new()
        .with_ensemble_size(50)
        .with_params(params);
    assert_eq!(*builder.params(), params);
}

#[test]
fn test_builder_build_unfitted() {
    let kernel = IsolationKernelBuilder::new().with_seed(5).build();
    assert!(!kernel.is_fitted());
    assert_eq!(kernel.params().seed, Some(5));
}

/// Picks the first `amount` indices, ignoring the seed.
struct FirstK;

impl CenterSampler for FirstK {
    fn draw(&self, _n_samples: usize, amount: usize, _seed: u64) -> Vec<usize> {
        (0..amount).collect()
    }
}

#[test]
fn test_builder_custom_sampler() {
    let rows = line_2d(10);
    let model = IsolationKernelBuilder::new()
        .with_ensemble_size(3)
        .with_sample_size(4)
        .with_seed(0)
        .fit_with_sampler(&rows, &FirstK)
        .unwrap();

    for ids in model.center_ids() {
        assert_eq!(ids, &[0, 1, 2, 3]);
    }
    // all members share the same centers: stored once
    assert_eq!(model.unique_ids(), &[0, 1, 2, 3]);
}

/// Repeats index 0, which a sampler without replacement must never do.
struct Repeating;

impl CenterSampler for Repeating {
    fn draw(&self, _n_samples: usize, amount: usize, _seed: u64) -> Vec<usize> {
        vec![0; amount]
    }
}

#[test]
fn test_builder_rejects_invalid_sampler_output() {
    let rows = line_2d(10);
    let err = IsolationKernelBuilder::new()
        .with_ensemble_size(2)
        .with_sample_size(3)
        .with_seed(0)
        .fit_with_sampler(&rows, &Repeating)
        .unwrap_err();
    assert!(matches!(err, KernelError::Validation(_)), "{}", err);
}
