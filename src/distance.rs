//! Euclidean distances between query rows and the center store.

use log::debug;
use rayon::prelude::*;
use smartcore::linalg::basic::arrays::{Array, Array2};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::errors::{KernelError, KernelResult};

/// Full `m x u` distance matrix between `queries` and the rows of `centers`.
///
/// Computed once per transform and shared by all ensemble members.
///
/// # Errors
///
/// `DimensionMismatch` if the query width differs from the center width.
pub fn pairwise_distances(
    queries: &[Vec<f64>],
    centers: &DenseMatrix<f64>,
) -> KernelResult<DenseMatrix<f64>> {
    let (n_centers, n_features) = centers.shape();
    let n_queries = queries.len();

    if let Some(q) = queries.iter().find(|q| q.len() != n_features) {
        return Err(KernelError::DimensionMismatch {
            expected: n_features,
            found: q.len(),
        });
    }

    debug!(
        "Computing {}x{} distance matrix over {} features",
        n_queries, n_centers, n_features
    );

    // one flat row-major buffer, each query row filled in place
    let mut flat = vec![0.0; n_queries * n_centers];
    if n_centers > 0 {
        flat.par_chunks_mut(n_centers)
            .zip(queries.par_iter())
            .for_each(|(out, q)| {
                for (j, slot) in out.iter_mut().enumerate() {
                    *slot = q
                        .iter()
                        .enumerate()
                        .map(|(k, x)| (x - centers.get((j, k))).powi(2))
                        .sum::<f64>()
                        .sqrt();
                }
            });
    }

    Ok(DenseMatrix::from_iterator(
        flat.into_iter(),
        n_queries,
        n_centers,
        0,
    ))
}

/// Position of the smallest value among `columns` of `row` in `dists`.
///
/// Scans `columns` in order with a strict `<`, so on ties the first
/// occurrence wins.
#[inline]
pub fn argmin_over(dists: &DenseMatrix<f64>, row: usize, columns: &[usize]) -> usize {
    let mut best_rank = 0;
    let mut best = f64::INFINITY;
    for (rank, &col) in columns.iter().enumerate() {
        let d = *dists.get((row, col));
        if d < best {
            best = d;
            best_rank = rank;
        }
    }
    best_rank
}
