//! Rule-of-thumb covariance estimators.
use ndarray::{Array2, ArrayView2, Axis};

use super::BandwidthEstimator;
use crate::error::{NprError, Result};

/// Unbiased sample covariance of `D×N` points (variables along rows).
pub fn sample_covariance(xdata: ArrayView2<f64>) -> Result<Array2<f64>> {
    let n = xdata.ncols();
    if n < 2 {
        return Err(NprError::InsufficientData { needed: 2, found: n });
    }
    let mean = xdata
        .mean_axis(Axis(1))
        .ok_or(NprError::InsufficientData { needed: 2, found: n })?;
    let centered = &xdata - &mean.insert_axis(Axis(1));
    Ok(centered.dot(&centered.t()) / (n - 1) as f64)
}

/// Scott's rule: `cov(x) · N^(-2/(D+4))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScottsCovariance;

impl BandwidthEstimator for ScottsCovariance {
    fn estimate(&self, xdata: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (d, n) = xdata.dim();
        let factor = (n as f64).powf(-2.0 / (d as f64 + 4.0));
        Ok(sample_covariance(xdata)? * factor)
    }
}

/// Silverman's rule: `cov(x) · (N(D+2)/4)^(-2/(D+4))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilvermanCovariance;

impl BandwidthEstimator for SilvermanCovariance {
    fn estimate(&self, xdata: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (d, n) = xdata.dim();
        let d = d as f64;
        let factor = (n as f64 * (d + 2.0) / 4.0).powf(-2.0 / (d + 4.0));
        Ok(sample_covariance(xdata)? * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_sample_covariance_1d() {
        let x = array![[1.0, 2.0, 3.0, 4.0, 5.0]];
        let cov = sample_covariance(x.view()).unwrap();
        assert_abs_diff_eq!(cov[[0, 0]], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_covariance_2d_off_diagonal() {
        let x = array![[1.0, 2.0, 3.0], [2.0, 4.0, 6.0]];
        let cov = sample_covariance(x.view()).unwrap();
        assert_abs_diff_eq!(cov[[0, 1]], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[1, 0]], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov[[1, 1]], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scott_factor() {
        let x = array![[1.0, 2.0, 3.0, 4.0, 5.0]];
        let cov = ScottsCovariance.estimate(x.view()).unwrap();
        assert_abs_diff_eq!(cov[[0, 0]], 2.5 * 5f64.powf(-0.4), epsilon = 1e-12);
    }

    #[test]
    fn test_silverman_factor() {
        let x = array![[1.0, 2.0, 3.0, 4.0, 5.0]];
        let cov = SilvermanCovariance.estimate(x.view()).unwrap();
        assert_abs_diff_eq!(cov[[0, 0]], 2.5 * 3.75f64.powf(-0.4), epsilon = 1e-12);
    }

    #[test]
    fn test_single_sample_fails() {
        let x = array![[1.0]];
        assert!(matches!(
            ScottsCovariance.estimate(x.view()),
            Err(NprError::InsufficientData { needed: 2, found: 1 })
        ));
    }
}
