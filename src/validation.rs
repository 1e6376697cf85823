//! Shape and value checks applied to every reference and query batch.

use log::trace;
use smartcore::linalg::basic::arrays::{Array, Array2};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::errors::{KernelError, KernelResult};

/// Check that `rows` is a non-empty, rectangular, finite 2D array.
///
/// Returns `(n_rows, n_features)`.
pub fn check_rows(rows: &[Vec<f64>]) -> KernelResult<(usize, usize)> {
    let first = rows.first().ok_or_else(|| {
        KernelError::Validation("found array with 0 sample(s); at least 1 is required".to_string())
    })?;

    let n_features = first.len();
    if n_features == 0 {
        return Err(KernelError::Validation(
            "found array with 0 feature(s); at least 1 is required".to_string(),
        ));
    }

    for (i, row) in rows.iter().enumerate() {
        if row.len() != n_features {
            return Err(KernelError::Validation(format!(
                "ragged input: row {} has {} features, expected {}",
                i,
                row.len(),
                n_features
            )));
        }
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(KernelError::Validation(format!(
                "input contains a non-finite value at ({}, {})",
                i, j
            )));
        }
    }

    trace!("Validated input of shape ({}, {})", rows.len(), n_features);
    Ok((rows.len(), n_features))
}

/// Copy a row-major `DenseMatrix` into owned rows.
pub fn matrix_to_rows(data: &DenseMatrix<f64>) -> Vec<Vec<f64>> {
    let (n_rows, _) = data.shape();
    (0..n_rows)
        .map(|i| data.get_row(i).iterator(0).copied().collect())
        .collect()
}
