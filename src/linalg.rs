//! Small dense linear algebra helpers backed by nalgebra.
//!
//! The rest of the crate works with ndarray; matrices are converted at the
//! boundary of each helper.
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{NprError, Result};

const SYMMETRY_TOL: f64 = 1e-10;

pub(crate) fn to_dmatrix(a: ArrayView2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub(crate) fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Principal square root of a symmetric positive definite matrix.
pub fn sqrtm_spd(a: ArrayView2<f64>) -> Result<Array2<f64>> {
    let m = to_dmatrix(a);
    let scale = m.amax().max(1.0);
    if (&m - m.transpose()).amax() > SYMMETRY_TOL * scale {
        return Err(NprError::InvalidBandwidth(
            "covariance matrix is not symmetric".to_string(),
        ));
    }
    let eigen = SymmetricEigen::new(m);
    if eigen.eigenvalues.iter().any(|&v| v.is_nan() || v <= 0.0) {
        return Err(NprError::InvalidBandwidth(
            "covariance matrix is not positive definite".to_string(),
        ));
    }
    let sqrt_vals = eigen.eigenvalues.map(f64::sqrt);
    let root = &eigen.eigenvectors
        * DMatrix::from_diagonal(&sqrt_vals)
        * eigen.eigenvectors.transpose();
    Ok(from_dmatrix(&root))
}

pub fn inverse(a: ArrayView2<f64>) -> Result<Array2<f64>> {
    to_dmatrix(a)
        .try_inverse()
        .map(|inv| from_dmatrix(&inv))
        .ok_or(NprError::SingularMatrix)
}

/// Least-squares solution of `a · x = b`, or `None` when the columns of `a`
/// are numerically dependent.
pub fn lstsq(a: ArrayView2<f64>, b: ArrayView1<f64>) -> Result<Option<Array1<f64>>> {
    let m = to_dmatrix(a);
    let rhs = DVector::from_iterator(b.len(), b.iter().copied());
    let size = m.nrows().max(m.ncols());
    let ncols = m.ncols();
    let svd = m.svd(true, true);
    let largest = svd.singular_values.amax();
    let eps = f64::EPSILON * largest.max(f64::MIN_POSITIVE) * size as f64;
    if svd.rank(eps) < ncols {
        return Ok(None);
    }
    let x = svd.solve(&rhs, eps).map_err(NprError::Solver)?;
    Ok(Some(Array1::from_iter(x.iter().copied())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_sqrtm_squares_back() {
        let a = array![[4.0, 1.0], [1.0, 3.0]];
        let r = sqrtm_spd(a.view()).unwrap();
        let back = r.dot(&r);
        for (x, y) in back.iter().zip(a.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_sqrtm_rejects_indefinite() {
        let a = array![[1.0, 2.0], [2.0, 1.0]];
        assert!(matches!(
            sqrtm_spd(a.view()),
            Err(NprError::InvalidBandwidth(_))
        ));
    }

    #[test]
    fn test_inverse_singular() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        assert!(matches!(inverse(a.view()), Err(NprError::SingularMatrix)));
    }

    #[test]
    fn test_lstsq_exact_system() {
        let a = array![[2.0, 0.0], [0.0, 4.0]];
        let x = lstsq(a.view(), array![2.0, 2.0].view()).unwrap().unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_lstsq_rank_deficient_is_none() {
        // fewer rows than unknowns
        let a = array![[1.0, 0.5]];
        assert!(lstsq(a.view(), array![3.0].view()).unwrap().is_none());
        // dependent columns
        let a = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        assert!(lstsq(a.view(), array![1.0, 2.0, 3.0].view())
            .unwrap()
            .is_none());
    }
}
