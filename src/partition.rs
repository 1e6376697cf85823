//! # Partition builder
//!
//! Builds the ensemble of Voronoi partitions behind the feature map:
//!
//! 1. Each of the T members draws ψ_eff = min(ψ, n) reference indices without
//!    replacement. Draw order is the center's rank inside the member.
//! 2. The union of all selections, sorted ascending, forms the [`CenterStore`].
//!    Centers shared by several members are stored once.
//! 3. A lookup maps every selected reference index to its row in the store, so
//!    each member's selection is resolved to store positions up front.

use std::collections::HashMap;

use log::{debug, info, trace};
use smartcore::linalg::basic::arrays::{Array, Array2};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::errors::{KernelError, KernelResult};
use crate::params::KernelParams;
use crate::sampling::{derive_member_seeds, CenterSampler};

/// Centers of one ensemble member, in rank order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CenterSelection {
    /// Indices into the reference dataset.
    pub center_ids: Vec<usize>,
    /// Row of each center inside the [`CenterStore`], same order as `center_ids`.
    pub store_rows: Vec<usize>,
}

impl CenterSelection {
    #[inline]
    pub fn len(&self) -> usize {
        self.center_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.center_ids.is_empty()
    }
}

/// Deduplicated center coordinates shared by all members.
#[derive(Clone, Debug)]
pub struct CenterStore {
    /// Sorted unique reference indices.
    pub unique_ids: Vec<usize>,
    /// One row per entry of `unique_ids`.
    pub center_data: DenseMatrix<f64>,
}

impl CenterStore {
    /// Gather the rows of `reference` at the union of `selections`.
    ///
    /// `reference` must be validated and every id in range.
    pub(crate) fn from_selections(reference: &[Vec<f64>], selections: &[Vec<usize>]) -> Self {
        let mut unique_ids: Vec<usize> = selections.iter().flatten().copied().collect();
        unique_ids.sort_unstable();
        unique_ids.dedup();

        let n_features = reference[0].len();
        let flat = unique_ids
            .iter()
            .flat_map(|&id| reference[id].iter().copied());
        let center_data = DenseMatrix::from_iterator(flat, unique_ids.len(), n_features, 0);

        Self {
            unique_ids,
            center_data,
        }
    }

    /// Store from previously gathered parts.
    ///
    /// `unique_ids` must be strictly increasing, and `center_data` must hold
    /// one finite row of `n_features` values per id.
    pub fn from_parts(
        unique_ids: Vec<usize>,
        center_data: DenseMatrix<f64>,
        n_features: usize,
    ) -> KernelResult<Self> {
        if unique_ids.windows(2).any(|w| w[0] >= w[1]) {
            return Err(KernelError::Validation(
                "unique_ids must be sorted ascending without repeats".to_string(),
            ));
        }
        let (n_rows, n_cols) = center_data.shape();
        if n_rows != unique_ids.len() || n_cols != n_features {
            return Err(KernelError::Validation(format!(
                "center_data is {}x{}, expected {}x{}",
                n_rows,
                n_cols,
                unique_ids.len(),
                n_features
            )));
        }
        let store = Self {
            unique_ids,
            center_data,
        };
        if (0..n_rows).any(|pos| store.row(pos).iter().any(|v| !v.is_finite())) {
            return Err(KernelError::Validation(
                "center_data contains a non-finite value".to_string(),
            ));
        }
        Ok(store)
    }

    /// Reference index -> row in `center_data`.
    pub fn lookup(&self) -> HashMap<usize, usize> {
        self.unique_ids
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.unique_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.unique_ids.is_empty()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.center_data.shape().1
    }

    /// Row `pos` of the store as an owned vector.
    pub fn row(&self, pos: usize) -> Vec<f64> {
        self.center_data.get_row(pos).iterator(0).copied().collect()
    }
}

/// Output of the partition builder.
#[derive(Clone, Debug)]
pub struct Partitions {
    pub selections: Vec<CenterSelection>,
    pub store: CenterStore,
    pub max_samples: usize,
}

/// Draw T selections and build the store. `reference` must already be validated.
///
/// Sampler output goes through the same checks as explicit selections.
pub fn build_partitions<S: CenterSampler>(
    reference: &[Vec<f64>],
    params: &KernelParams,
    root_seed: u64,
    sampler: &S,
) -> KernelResult<Partitions> {
    let n_samples = reference.len();
    let max_samples = params.effective_sample_size(n_samples);

    info!(
        "Building {} partitions over {} reference points",
        params.ensemble_size, n_samples
    );
    if max_samples < params.sample_size {
        debug!(
            "sample_size {} exceeds reference size, clamped to {}",
            params.sample_size, max_samples
        );
    }

    let seeds = derive_member_seeds(root_seed, params.ensemble_size);
    let raw: Vec<Vec<usize>> = seeds
        .iter()
        .map(|&seed| sampler.draw(n_samples, max_samples, seed))
        .collect();

    if let Some((t, ids)) = raw.iter().enumerate().find(|(_, ids)| ids.len() != max_samples) {
        return Err(KernelError::Validation(format!(
            "sampler drew {} centers for member {}, expected {}",
            ids.len(),
            t,
            max_samples
        )));
    }

    partitions_from_selections(reference, raw)
}

/// Build partitions from explicit per-member center lists.
///
/// Every list must have the same non-zero length, reference only valid rows,
/// and contain no repeated index. `reference` must already be validated.
pub fn partitions_from_selections(
    reference: &[Vec<f64>],
    selections: Vec<Vec<usize>>,
) -> KernelResult<Partitions> {
    let n_samples = reference.len();
    let max_samples = check_selection_shape(&selections)?;

    for (t, ids) in selections.iter().enumerate() {
        if let Some(&bad) = ids.iter().find(|&&id| id >= n_samples) {
            return Err(KernelError::Validation(format!(
                "member {} references index {} but reference has {} rows",
                t, bad, n_samples
            )));
        }
    }

    let store = CenterStore::from_selections(reference, &selections);
    assemble(store, selections, max_samples)
}

/// Rebuild partitions from a stored center set and per-member center lists.
///
/// Used when loading a saved model: the store is checked on its own, then
/// every selected id must be present in it.
pub fn partitions_from_store(
    store: CenterStore,
    selections: Vec<Vec<usize>>,
) -> KernelResult<Partitions> {
    let max_samples = check_selection_shape(&selections)?;
    assemble(store, selections, max_samples)
}

/// Equal non-zero lengths, at least one member, no repeats within a member.
///
/// Returns the common length.
fn check_selection_shape(selections: &[Vec<usize>]) -> KernelResult<usize> {
    let max_samples = match selections.first() {
        Some(first) if !first.is_empty() => first.len(),
        Some(_) => {
            return Err(KernelError::Validation(
                "center selections must not be empty".to_string(),
            ))
        }
        None => {
            return Err(KernelError::Validation(
                "at least one ensemble member is required".to_string(),
            ))
        }
    };

    for (t, ids) in selections.iter().enumerate() {
        if ids.len() != max_samples {
            return Err(KernelError::Validation(format!(
                "member {} has {} centers, expected {}",
                t,
                ids.len(),
                max_samples
            )));
        }
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(KernelError::Validation(format!(
                "member {} selects the same center twice",
                t
            )));
        }
    }

    Ok(max_samples)
}

fn assemble(
    store: CenterStore,
    raw: Vec<Vec<usize>>,
    max_samples: usize,
) -> KernelResult<Partitions> {
    let lookup = store.lookup();

    let selections = raw
        .into_iter()
        .enumerate()
        .map(|(t, center_ids)| {
            let store_rows = center_ids
                .iter()
                .map(|id| {
                    lookup.get(id).copied().ok_or_else(|| {
                        KernelError::Validation(format!(
                            "member {} selects index {} missing from the center store",
                            t, id
                        ))
                    })
                })
                .collect::<KernelResult<Vec<usize>>>()?;
            Ok(CenterSelection {
                center_ids,
                store_rows,
            })
        })
        .collect::<KernelResult<Vec<CenterSelection>>>()?;

    trace!(
        "Resolved {} selections against store of {} rows",
        selections.len(),
        store.len()
    );
    info!(
        "Partitions ready: {} members x {} centers, {} unique centers stored",
        selections.len(),
        max_samples,
        store.len()
    );

    Ok(Partitions {
        selections,
        store,
        max_samples,
    })
}
