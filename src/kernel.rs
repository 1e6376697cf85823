//! Isolation Kernel: fitted state and the estimator wrapper.
//!
//! - [`FittedModel`]: immutable output of fitting. Holds the configuration, the
//!   T center selections, the deduplicated center store and ψ_eff. Safe to
//!   share across threads; every `transform` only reads it.
//! - [`IsolationKernel`]: fit/transform estimator that owns an optional
//!   `FittedModel` and refuses to transform before it has been fitted.
//!
//! # Examples
//!
//! ```
//! use isokernel::kernel::FittedModel;
//!
//! // ten points on a line, one member with centers {0, 4, 9}
//! let reference: Vec<Vec<f64>> = (0..10).map(|x| vec![x as f64, 0.0]).collect();
//! let model = FittedModel::from_selections(&reference, vec![vec![0, 4, 9]]).unwrap();
//!
//! let features = model.transform(&[vec![5.0, 0.0]]).unwrap();
//! assert_eq!(features.shape(), (1, 3));
//! assert_eq!(features.get(0, 1), Some(&1.0));
//! assert_eq!(features.nnz(), 1);
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize, Serializer};
use smartcore::linalg::basic::matrix::DenseMatrix;
use sprs::CsMat;

use crate::distance::pairwise_distances;
use crate::errors::{KernelError, KernelResult};
use crate::feature_map::{assemble_dense, assemble_features, nearest_ranks, shared_cell_fraction};
use crate::params::KernelParams;
use crate::partition::{
    build_partitions, partitions_from_selections, partitions_from_store, CenterSelection,
    CenterStore, Partitions,
};
use crate::sampling::{resolve_root_seed, CenterSampler, UniformSampler};
use crate::validation::{check_rows, matrix_to_rows};

/// Fitted Isolation Kernel feature map.
///
/// Serializes as [`FittedModelParts`]; loading re-validates every invariant
/// and rebuilds the center-to-store lookup.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "FittedModelParts")]
pub struct FittedModel {
    params: KernelParams,
    root_seed: Option<u64>,
    n_features: usize,
    max_samples: usize,
    selections: Vec<CenterSelection>,
    store: CenterStore,
}

impl FittedModel {
    /// Fit the partition ensemble on `reference` with uniform center sampling.
    pub fn fit(reference: &[Vec<f64>], params: KernelParams) -> KernelResult<Self> {
        Self::fit_with_sampler(reference, params, &UniformSampler)
    }

    /// Fit with a custom center sampling strategy.
    pub fn fit_with_sampler<S: CenterSampler>(
        reference: &[Vec<f64>],
        params: KernelParams,
        sampler: &S,
    ) -> KernelResult<Self> {
        params.validate()?;
        let (n_samples, n_features) = check_rows(reference)?;
        let root_seed = resolve_root_seed(params.seed);
        debug!(
            "Fitting on {} samples x {} features: T={}, psi={}, root seed {}",
            n_samples, n_features, params.ensemble_size, params.sample_size, root_seed
        );

        let partitions = build_partitions(reference, &params, root_seed, sampler)?;
        Ok(Self::from_partitions(params, Some(root_seed), n_features, partitions))
    }

    /// Build a model from explicit per-member center lists.
    ///
    /// `selections[t]` holds the reference indices of member `t`'s centers in
    /// rank order. All members must select the same number of centers.
    pub fn from_selections(
        reference: &[Vec<f64>],
        selections: Vec<Vec<usize>>,
    ) -> KernelResult<Self> {
        let (_, n_features) = check_rows(reference)?;
        let partitions = partitions_from_selections(reference, selections)?;
        let params = KernelParams::new(partitions.selections.len(), partitions.max_samples, None);
        Ok(Self::from_partitions(params, None, n_features, partitions))
    }

    fn from_partitions(
        params: KernelParams,
        root_seed: Option<u64>,
        n_features: usize,
        partitions: Partitions,
    ) -> Self {
        let Partitions {
            selections,
            store,
            max_samples,
        } = partitions;
        Self {
            params,
            root_seed,
            n_features,
            max_samples,
            selections,
            store,
        }
    }

    /// Map `queries` to the `m x (T * max_samples)` sparse indicator matrix.
    ///
    /// # Errors
    ///
    /// - `Validation` for empty, ragged or non-finite input
    /// - `DimensionMismatch` if the query width differs from the fitted width
    pub fn transform(&self, queries: &[Vec<f64>]) -> KernelResult<CsMat<f64>> {
        let ranks = self.ranks(queries)?;
        Ok(assemble_features(&ranks, queries.len(), self.max_samples))
    }

    /// Same as [`FittedModel::transform`], returned as a dense matrix.
    pub fn transform_dense(&self, queries: &[Vec<f64>]) -> KernelResult<DenseMatrix<f64>> {
        let ranks = self.ranks(queries)?;
        Ok(assemble_dense(&ranks, queries.len(), self.max_samples))
    }

    /// Isolation Kernel similarity between every row of `x` and every row of `y`.
    ///
    /// Entry `(i, j)` is the fraction of members in which `x_i` and `y_j` fall
    /// in the same Voronoi cell, i.e. `phi(x_i) . phi(y_j) / T`. With `y = None`
    /// the similarity of `x` against itself is returned.
    pub fn similarity(
        &self,
        x: &[Vec<f64>],
        y: Option<&[Vec<f64>]>,
    ) -> KernelResult<DenseMatrix<f64>> {
        let x_ranks = self.ranks(x)?;
        let sim = match y {
            Some(y) => {
                let y_ranks = self.ranks(y)?;
                shared_cell_fraction(&x_ranks, &y_ranks)
            }
            None => shared_cell_fraction(&x_ranks, &x_ranks),
        };
        Ok(sim)
    }

    fn ranks(&self, queries: &[Vec<f64>]) -> KernelResult<Vec<Vec<usize>>> {
        let (_, found) = check_rows(queries)?;
        if found != self.n_features {
            return Err(KernelError::DimensionMismatch {
                expected: self.n_features,
                found,
            });
        }
        let dists = pairwise_distances(queries, &self.store.center_data)?;
        Ok(nearest_ranks(&dists, &self.selections))
    }

    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    /// Root seed actually used at fit time; `None` for models built from
    /// explicit selections.
    pub fn seed(&self) -> Option<u64> {
        self.root_seed
    }

    /// Number of ensemble members (T).
    pub fn ensemble_size(&self) -> usize {
        self.selections.len()
    }

    /// Effective sample size ψ_eff = min(ψ, n).
    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Feature width of the reference data.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Width of the transformed output, T * ψ_eff.
    pub fn n_output_features(&self) -> usize {
        self.ensemble_size() * self.max_samples
    }

    pub fn selections(&self) -> &[CenterSelection] {
        &self.selections
    }

    /// Reference indices of each member's centers, in rank order.
    pub fn center_ids(&self) -> Vec<&[usize]> {
        self.selections
            .iter()
            .map(|s| s.center_ids.as_slice())
            .collect()
    }

    pub fn unique_ids(&self) -> &[usize] {
        &self.store.unique_ids
    }

    pub fn center_data(&self) -> &DenseMatrix<f64> {
        &self.store.center_data
    }

    pub fn store(&self) -> &CenterStore {
        &self.store
    }
}

/// Persisted form of a [`FittedModel`]: configuration, per-member center ids,
/// sorted unique ids and the gathered center coordinates.
#[derive(Clone, Debug, Deserialize)]
pub struct FittedModelParts {
    pub params: KernelParams,
    pub root_seed: Option<u64>,
    pub n_features: usize,
    pub max_samples: usize,
    pub center_ids: Vec<Vec<usize>>,
    pub unique_ids: Vec<usize>,
    pub center_data: DenseMatrix<f64>,
}

#[derive(Serialize)]
struct FittedModelPartsRef<'a> {
    params: &'a KernelParams,
    root_seed: Option<u64>,
    n_features: usize,
    max_samples: usize,
    center_ids: Vec<&'a [usize]>,
    unique_ids: &'a [usize],
    center_data: &'a DenseMatrix<f64>,
}

impl Serialize for FittedModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FittedModelPartsRef {
            params: &self.params,
            root_seed: self.root_seed,
            n_features: self.n_features,
            max_samples: self.max_samples,
            center_ids: self.center_ids(),
            unique_ids: &self.store.unique_ids,
            center_data: &self.store.center_data,
        }
        .serialize(serializer)
    }
}

impl TryFrom<FittedModelParts> for FittedModel {
    type Error = KernelError;

    fn try_from(parts: FittedModelParts) -> KernelResult<Self> {
        parts.params.validate()?;
        if parts.n_features == 0 {
            return Err(KernelError::Validation(
                "n_features must be at least 1".to_string(),
            ));
        }

        let store = CenterStore::from_parts(parts.unique_ids, parts.center_data, parts.n_features)?;
        let partitions = partitions_from_store(store, parts.center_ids)?;

        if partitions.max_samples != parts.max_samples {
            return Err(KernelError::Validation(format!(
                "members hold {} centers but max_samples is {}",
                partitions.max_samples, parts.max_samples
            )));
        }
        if partitions.selections.len() != parts.params.ensemble_size {
            return Err(KernelError::Validation(format!(
                "{} members stored but ensemble_size is {}",
                partitions.selections.len(),
                parts.params.ensemble_size
            )));
        }
        if partitions.max_samples > parts.params.sample_size {
            return Err(KernelError::Validation(format!(
                "max_samples {} exceeds sample_size {}",
                partitions.max_samples, parts.params.sample_size
            )));
        }

        debug!(
            "Restored model: {} members x {} centers, {} unique",
            partitions.selections.len(),
            partitions.max_samples,
            partitions.store.len()
        );
        Ok(Self::from_partitions(
            parts.params,
            parts.root_seed,
            parts.n_features,
            partitions,
        ))
    }
}

/// Fit/transform estimator around [`FittedModel`].
#[derive(Clone, Debug, Default)]
pub struct IsolationKernel {
    params: KernelParams,
    fitted: Option<FittedModel>,
}

impl IsolationKernel {
    pub fn new(params: KernelParams) -> Self {
        info!("Initializing IsolationKernel with {:?}", params);
        Self {
            params,
            fitted: None,
        }
    }

    /// Fit on `reference`. On error the previous fitted state is kept.
    pub fn fit(&mut self, reference: &[Vec<f64>]) -> KernelResult<&mut Self> {
        let model = FittedModel::fit(reference, self.params)?;
        self.fitted = Some(model);
        Ok(self)
    }

    pub fn fit_matrix(&mut self, reference: &DenseMatrix<f64>) -> KernelResult<&mut Self> {
        self.fit(&matrix_to_rows(reference))
    }

    pub fn transform(&self, queries: &[Vec<f64>]) -> KernelResult<CsMat<f64>> {
        self.fitted()?.transform(queries)
    }

    pub fn transform_matrix(&self, queries: &DenseMatrix<f64>) -> KernelResult<CsMat<f64>> {
        let model = self.fitted()?;
        model.transform(&matrix_to_rows(queries))
    }

    pub fn transform_dense(&self, queries: &[Vec<f64>]) -> KernelResult<DenseMatrix<f64>> {
        self.fitted()?.transform_dense(queries)
    }

    pub fn fit_transform(&mut self, reference: &[Vec<f64>]) -> KernelResult<CsMat<f64>> {
        self.fit(reference)?.transform(reference)
    }

    pub fn similarity(
        &self,
        x: &[Vec<f64>],
        y: Option<&[Vec<f64>]>,
    ) -> KernelResult<DenseMatrix<f64>> {
        self.fitted()?.similarity(x, y)
    }

    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn fitted(&self) -> KernelResult<&FittedModel> {
        self.fitted.as_ref().ok_or(KernelError::NotFitted)
    }

    pub fn into_fitted(self) -> KernelResult<FittedModel> {
        self.fitted.ok_or(KernelError::NotFitted)
    }
}

impl From<FittedModel> for IsolationKernel {
    fn from(model: FittedModel) -> Self {
        Self {
            params: *model.params(),
            fitted: Some(model),
        }
    }
}
