//! # isokernel
//!
//! Isolation Kernel feature map built from an ensemble of Voronoi partitions.
//!
//! Fitting draws T independent samples of ψ reference points; each sample is
//! the set of centers of one Voronoi partition. Transforming assigns every
//! query to its nearest center in each partition and emits a sparse binary
//! vector with exactly one active column per partition. The inner product of
//! two such vectors, divided by T, estimates the probability that both points
//! share a cell: a similarity that adapts to local data density.
//!
//! The embedding is meant as a preprocessing step for density- and
//! distance-based clustering and anomaly detection.
//!
//! ```
//! use isokernel::builder::IsolationKernelBuilder;
//!
//! let reference: Vec<Vec<f64>> = (0..50)
//!     .map(|i| vec![(i as f64 / 5.0).sin(), (i as f64 / 5.0).cos()])
//!     .collect();
//!
//! let model = IsolationKernelBuilder::new()
//!     .with_ensemble_size(16)
//!     .with_sample_size(8)
//!     .with_seed(7)
//!     .fit(&reference)
//!     .unwrap();
//!
//! let features = model.transform(&reference[..5]).unwrap();
//! assert_eq!(features.shape(), (5, 16 * 8));
//! assert_eq!(features.nnz(), 5 * 16);
//! ```

pub mod builder;
pub mod distance;
pub mod errors;
pub mod feature_map;
pub mod kernel;
pub mod params;
pub mod partition;
pub mod sampling;
pub mod validation;

pub use builder::IsolationKernelBuilder;
pub use errors::{KernelError, KernelResult};
pub use kernel::{FittedModel, FittedModelParts, IsolationKernel};
pub use params::KernelParams;

#[cfg(test)]
mod tests;
