use approx::assert_relative_eq;
use smartcore::linalg::basic::arrays::{Array, Array2};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::distance::{argmin_over, pairwise_distances};
use crate::errors::KernelError;

fn centers(rows: &[Vec<f64>]) -> DenseMatrix<f64> {
    let f = rows[0].len();
    DenseMatrix::from_iterator(rows.iter().flatten().copied(), rows.len(), f, 0)
}

#[test]
fn test_pairwise_distance_basic() {
    let c = centers(&[vec![1.0, 1.0, 1.0]]);
    let d = pairwise_distances(&[vec![0.0, 0.0, 0.0]], &c).unwrap();
    assert_relative_eq!(*d.get((0, 0)), 3.0_f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn test_pairwise_distance_identity_is_exact_zero() {
    let row = vec![3.5, -2.1, 4.8];
    let c = centers(&[row.clone(), vec![0.0, 0.0, 0.0]]);
    let d = pairwise_distances(&[row], &c).unwrap();
    assert_eq!(*d.get((0, 0)), 0.0);
    assert!(*d.get((0, 1)) > 0.0);
}

#[test]
fn test_pairwise_distances_row_major_layout() {
    // 4 queries x 3 centers on a line: entry (i, j) = |i - 10 j|
    let c = centers(&[vec![0.0], vec![10.0], vec![20.0]]);
    let q: Vec<Vec<f64>> = (0..4).map(|i| vec![i as f64]).collect();
    let d = pairwise_distances(&q, &c).unwrap();

    assert_eq!(d.shape(), (4, 3));
    for i in 0..4 {
        for j in 0..3 {
            let expected = (i as f64 - 10.0 * j as f64).abs();
            assert_relative_eq!(*d.get((i, j)), expected, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_pairwise_distances_shape_and_values() {
    let c = centers(&[vec![0.0, 0.0], vec![3.0, 4.0]]);
    let q = vec![vec![0.0, 0.0], vec![3.0, 0.0], vec![6.0, 8.0]];

    let d = pairwise_distances(&q, &c).unwrap();
    assert_eq!(d.shape(), (3, 2));
    assert_relative_eq!(*d.get((0, 0)), 0.0);
    assert_relative_eq!(*d.get((0, 1)), 5.0, epsilon = 1e-12);
    assert_relative_eq!(*d.get((1, 0)), 3.0, epsilon = 1e-12);
    assert_relative_eq!(*d.get((1, 1)), 4.0, epsilon = 1e-12);
    assert_relative_eq!(*d.get((2, 1)), 5.0, epsilon = 1e-12);
}

#[test]
fn test_pairwise_distances_dimension_mismatch() {
    let c = centers(&[vec![0.0, 0.0], vec![1.0, 1.0]]);
    let q = vec![vec![0.0, 0.0, 0.0]];

    let err = pairwise_distances(&q, &c).unwrap_err();
    assert_eq!(
        err,
        KernelError::DimensionMismatch {
            expected: 2,
            found: 3
        }
    );
}

#[test]
fn test_argmin_over_subset_of_columns() {
    let c = centers(&[vec![0.0], vec![4.0], vec![9.0], vec![5.5]]);
    let q = vec![vec![5.0]];
    let d = pairwise_distances(&q, &c).unwrap();

    // member sees only store rows 0, 1, 2
    assert_eq!(argmin_over(&d, 0, &[0, 1, 2]), 1);
    // rank is the position inside `columns`, not the store row
    assert_eq!(argmin_over(&d, 0, &[2, 0, 3, 1]), 2);
}

#[test]
fn test_argmin_over_ties_take_first_occurrence() {
    let c = centers(&[vec![0.0], vec![2.0]]);
    let q = vec![vec![1.0]];
    let d = pairwise_distances(&q, &c).unwrap();

    assert_eq!(argmin_over(&d, 0, &[0, 1]), 0);
    assert_eq!(argmin_over(&d, 0, &[1, 0]), 0);
}
