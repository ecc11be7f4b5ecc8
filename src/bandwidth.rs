//! Bandwidth and covariance of the kernel.
//!
//! The bandwidth `B` scales offsets before they reach the kernel; the
//! covariance is `B·Bᵀ`. Either can be given as a fixed matrix or as an
//! estimator evaluated on the data at fit time. [`BandwidthSpec`] holds
//! exactly one of these four forms.
use std::fmt;
use std::sync::Arc;

use ndarray::{Array, Array2, ArrayView2, Dimension, Ix1, Ix2};

use crate::error::{NprError, Result};
use crate::linalg;

mod rules;

pub use rules::{sample_covariance, ScottsCovariance, SilvermanCovariance};

/// Computes a bandwidth or covariance matrix from `D×N` sample points.
pub trait BandwidthEstimator: Send + Sync {
    fn estimate(&self, xdata: ArrayView2<f64>) -> Result<Array2<f64>>;
}

impl<F> BandwidthEstimator for F
where
    F: Fn(ArrayView2<f64>) -> Result<Array2<f64>> + Send + Sync,
{
    fn estimate(&self, xdata: ArrayView2<f64>) -> Result<Array2<f64>> {
        self(xdata)
    }
}

#[derive(Clone)]
pub enum BandwidthSpec {
    Bandwidth(Array2<f64>),
    BandwidthFn(Arc<dyn BandwidthEstimator>),
    Covariance(Array2<f64>),
    CovarianceFn(Arc<dyn BandwidthEstimator>),
}

impl fmt::Debug for BandwidthSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandwidthSpec::Bandwidth(bw) => f.debug_tuple("Bandwidth").field(bw).finish(),
            BandwidthSpec::BandwidthFn(_) => f.write_str("BandwidthFn(..)"),
            BandwidthSpec::Covariance(cov) => f.debug_tuple("Covariance").field(cov).finish(),
            BandwidthSpec::CovarianceFn(_) => f.write_str("CovarianceFn(..)"),
        }
    }
}

impl Default for BandwidthSpec {
    fn default() -> Self {
        BandwidthSpec::CovarianceFn(Arc::new(ScottsCovariance))
    }
}

/// Concrete bandwidth for a fit, all matrices `D×D`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBandwidth {
    pub bandwidth: Array2<f64>,
    pub covariance: Array2<f64>,
    pub inv_bandwidth: Array2<f64>,
}

/// Promotes a scalar, vector (diagonal) or matrix to a 2-D bandwidth value.
pub fn coerce_matrix<D: Dimension>(what: &'static str, value: Array<f64, D>) -> Result<Array2<f64>> {
    let value = value.into_dyn();
    match value.ndim() {
        0 => {
            let h = value.iter().next().copied().unwrap_or(f64::NAN);
            Ok(Array2::from_elem((1, 1), h))
        }
        1 => Ok(Array2::from_diag(&value.into_dimensionality::<Ix1>()?)),
        2 => Ok(value.into_dimensionality::<Ix2>()?),
        found => Err(NprError::Shape {
            what,
            expected: 2,
            found,
        }),
    }
}

/// Broadcasts a `1×1` value to `h·I` and checks the final size is `dim×dim`.
fn broadcast(what: &'static str, value: Array2<f64>, dim: usize) -> Result<Array2<f64>> {
    if value.iter().any(|v| !v.is_finite()) {
        return Err(NprError::InvalidBandwidth(format!("{what} has non-finite entries")));
    }
    if value.dim() == (1, 1) && dim != 1 {
        return Ok(Array2::eye(dim) * value[[0, 0]]);
    }
    if value.nrows() != dim {
        return Err(NprError::DimensionMismatch {
            what,
            expected: dim,
            found: value.nrows(),
        });
    }
    if value.ncols() != dim {
        return Err(NprError::DimensionMismatch {
            what,
            expected: dim,
            found: value.ncols(),
        });
    }
    Ok(value)
}

impl BandwidthSpec {
    /// Evaluates estimators if needed and derives the missing counterpart.
    pub fn resolve(&self, xdata: ArrayView2<f64>) -> Result<ResolvedBandwidth> {
        let dim = xdata.nrows();
        let (bandwidth, covariance) = match self {
            BandwidthSpec::Bandwidth(bw) => Self::from_bandwidth(bw.clone(), dim)?,
            BandwidthSpec::BandwidthFn(f) => Self::from_bandwidth(f.estimate(xdata)?, dim)?,
            BandwidthSpec::Covariance(cov) => Self::from_covariance(cov.clone(), dim)?,
            BandwidthSpec::CovarianceFn(f) => Self::from_covariance(f.estimate(xdata)?, dim)?,
        };
        let inv_bandwidth = linalg::inverse(bandwidth.view())?;
        Ok(ResolvedBandwidth {
            bandwidth,
            covariance,
            inv_bandwidth,
        })
    }

    fn from_bandwidth(bw: Array2<f64>, dim: usize) -> Result<(Array2<f64>, Array2<f64>)> {
        let bw = broadcast("bandwidth", bw, dim)?;
        let cov = bw.dot(&bw.t());
        Ok((bw, cov))
    }

    fn from_covariance(cov: Array2<f64>, dim: usize) -> Result<(Array2<f64>, Array2<f64>)> {
        let cov = broadcast("covariance", cov, dim)?;
        let bw = linalg::sqrtm_spd(cov.view())?;
        Ok((bw, cov))
    }
}
