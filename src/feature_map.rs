//! # Feature mapper
//!
//! Maps query rows to the Isolation Kernel feature space. For member `t`, a
//! query falls in the Voronoi cell of its nearest center (rank `r` within the
//! member) and gets a single `1.0` at column `t * max_samples + r`.
//!
//! Members occupy disjoint column blocks and contribute exactly one column per
//! row, so every output row has exactly T non-zeros and no `(row, col)` pair
//! is ever written twice.

use log::{debug, info, trace};
use rayon::prelude::*;
use smartcore::linalg::basic::arrays::{Array, Array2};
use smartcore::linalg::basic::matrix::DenseMatrix;
use sprs::{CsMat, TriMat};

use crate::distance::argmin_over;
use crate::partition::CenterSelection;

/// Nearest-center rank of every query row, one vector per member.
pub fn nearest_ranks(dists: &DenseMatrix<f64>, selections: &[CenterSelection]) -> Vec<Vec<usize>> {
    let (n_queries, _) = dists.shape();
    selections
        .par_iter()
        .map(|sel| {
            (0..n_queries)
                .map(|i| argmin_over(dists, i, &sel.store_rows))
                .collect()
        })
        .collect()
}

/// Assemble per-member ranks into the `m x (T * max_samples)` CSR indicator matrix.
pub fn assemble_features(ranks: &[Vec<usize>], n_queries: usize, max_samples: usize) -> CsMat<f64> {
    let n_cols = ranks.len() * max_samples;
    debug!(
        "Assembling {}x{} feature matrix from {} members",
        n_queries,
        n_cols,
        ranks.len()
    );

    let mut triplets = TriMat::with_capacity((n_queries, n_cols), n_queries * ranks.len());
    for (t, member) in ranks.iter().enumerate() {
        let offset = t * max_samples;
        for (i, &r) in member.iter().enumerate() {
            triplets.add_triplet(i, offset + r, 1.0);
        }
        trace!("member {} written at column offset {}", t, offset);
    }

    let features: CsMat<f64> = triplets.to_csr();
    info!(
        "Feature map built: {}x{} with {} non-zeros",
        n_queries,
        n_cols,
        features.nnz()
    );
    features
}

/// Same embedding as [`assemble_features`], materialized densely.
pub fn assemble_dense(ranks: &[Vec<usize>], n_queries: usize, max_samples: usize) -> DenseMatrix<f64> {
    let n_cols = ranks.len() * max_samples;
    let mut flat = vec![0.0; n_queries * n_cols];
    for (t, member) in ranks.iter().enumerate() {
        let offset = t * max_samples;
        for (i, &r) in member.iter().enumerate() {
            flat[i * n_cols + offset + r] = 1.0;
        }
    }
    DenseMatrix::from_iterator(flat.into_iter(), n_queries, n_cols, 0)
}

/// Number of members in which each `(x_i, y_j)` pair shares a cell, divided by T.
pub fn shared_cell_fraction(x_ranks: &[Vec<usize>], y_ranks: &[Vec<usize>]) -> DenseMatrix<f64> {
    let n_members = x_ranks.len();
    let n_x = x_ranks.first().map(|r| r.len()).unwrap_or(0);
    let n_y = y_ranks.first().map(|r| r.len()).unwrap_or(0);

    let rows: Vec<Vec<f64>> = (0..n_x)
        .into_par_iter()
        .map(|i| {
            (0..n_y)
                .map(|j| {
                    let shared = x_ranks
                        .iter()
                        .zip(y_ranks)
                        .filter(|(xm, ym)| xm[i] == ym[j])
                        .count();
                    shared as f64 / n_members as f64
                })
                .collect()
        })
        .collect();

    DenseMatrix::from_iterator(rows.into_iter().flatten(), n_x, n_y, 0)
}
