//! Regression methods: how a fitted kernel and bandwidth turn into estimates.
//!
//! A [`RegressionMethod`] is fitted against the [`RegressionData`] of a model
//! and then evaluated at query points. Whatever it computes during `fit` is
//! owned by the method; `evaluate` takes `&self` and never mutates it, so a
//! fitted method can be shared between threads.
//!
//! Out-of-domain policy shared by every method in this module: a query point
//! lying outside `[lower, upper]` in any dimension evaluates to NaN, and so
//! does a point that receives zero total kernel weight.
use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis};

#[cfg(feature = "use-rayon")]
use rayon::prelude::*;

use crate::bandwidth::ResolvedBandwidth;
use crate::error::{NprError, Result};
use crate::kernels::Kernel;
use crate::regression::RegressionData;

mod local_linear;
mod local_polynomial;
mod spatial_average;

pub use local_linear::LocalLinearKernel1D;
pub use local_polynomial::LocalPolynomialKernel;
pub use spatial_average::SpatialAverage;

pub trait RegressionMethod: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Resolves kernel and bandwidth for `data` and stores the fitted state.
    fn fit(&mut self, data: &RegressionData) -> Result<()>;

    /// Writes one estimate per column of `points` into `out`.
    fn evaluate(
        &self,
        data: &RegressionData,
        points: ArrayView2<f64>,
        out: ArrayViewMut1<f64>,
    ) -> Result<()>;

    fn box_clone(&self) -> Box<dyn RegressionMethod>;
}

impl Clone for Box<dyn RegressionMethod> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Local-linear regression, used when no method is configured.
pub fn default_method() -> Box<dyn RegressionMethod> {
    Box::new(LocalPolynomialKernel::new(1))
}

/// Kernel and bandwidth resolved for one fit, with the responses and the
/// samples pre-scaled by the inverse bandwidth.
#[derive(Debug, Clone)]
pub struct KernelFit {
    pub kernel: Arc<dyn Kernel>,
    pub bandwidth: ResolvedBandwidth,
    scaled_x: Array2<f64>,
    ydata: Array1<f64>,
}

impl KernelFit {
    pub fn new(data: &RegressionData) -> Result<Self> {
        let xdata = data.xdata();
        let ydata = data.ydata();
        if ydata.len() != xdata.ncols() {
            return Err(NprError::DimensionMismatch {
                what: "ydata length",
                expected: xdata.ncols(),
                found: ydata.len(),
            });
        }
        let kernel = data.kernel_spec().resolve(xdata.nrows());
        if let Some(kernel_dim) = kernel.dim() {
            if kernel_dim != xdata.nrows() {
                return Err(NprError::DimensionMismatch {
                    what: "kernel dimension",
                    expected: xdata.nrows(),
                    found: kernel_dim,
                });
            }
        }
        let bandwidth = data.bandwidth_spec().resolve(xdata)?;
        let scaled_x = bandwidth.inv_bandwidth.dot(&xdata);
        log::debug!(
            "Resolved bandwidth {:?} for {} samples in {} dimensions",
            bandwidth.bandwidth,
            xdata.ncols(),
            xdata.nrows()
        );
        Ok(KernelFit {
            kernel,
            bandwidth,
            scaled_x,
            ydata: ydata.to_owned(),
        })
    }

    pub fn dim(&self) -> usize {
        self.scaled_x.nrows()
    }

    /// Responses the fit was computed on.
    pub fn ydata(&self) -> ArrayView1<f64> {
        self.ydata.view()
    }

    /// Scaled offsets `B⁻¹ (point - x_i)`, one column per sample.
    pub fn offsets(&self, point: ArrayView1<f64>) -> Array2<f64> {
        let scaled_point = self.bandwidth.inv_bandwidth.dot(&point);
        &scaled_point.insert_axis(Axis(1)) - &self.scaled_x
    }

    pub fn weights(&self, point: ArrayView1<f64>) -> Array1<f64> {
        self.kernel.pdf(self.offsets(point).view())
    }

    /// Kernel-weighted mean of the responses, `None` without positive weight.
    pub fn weighted_mean(&self, weights: ArrayView1<f64>) -> Option<f64> {
        let total = weights.sum();
        (total > 0.0).then(|| weights.dot(&self.ydata) / total)
    }
}

fn in_domain(point: ArrayView1<f64>, lower: &Array1<f64>, upper: &Array1<f64>) -> bool {
    point
        .iter()
        .zip(lower.iter().zip(upper.iter()))
        .all(|(&v, (&lo, &hi))| v >= lo && v <= hi)
}

/// Applies `estimate` to every in-domain column of `points`.
///
/// `estimate` returns `None` when no sample has positive weight; those
/// points, like out-of-domain ones, are set to NaN.
pub(crate) fn evaluate_points<F>(
    data: &RegressionData,
    fit: &KernelFit,
    points: ArrayView2<f64>,
    out: ArrayViewMut1<f64>,
    estimate: F,
) -> Result<()>
where
    F: Fn(ArrayView1<f64>) -> Result<Option<f64>> + Sync,
{
    if points.nrows() != fit.dim() {
        return Err(NprError::DimensionMismatch {
            what: "evaluation point dimension",
            expected: fit.dim(),
            found: points.nrows(),
        });
    }
    if out.len() != points.ncols() {
        return Err(NprError::DimensionMismatch {
            what: "output buffer length",
            expected: points.ncols(),
            found: out.len(),
        });
    }
    let lower = data.lower();
    let upper = data.upper();
    let eval = |j: usize| {
        let point = points.column(j);
        if in_domain(point, &lower, &upper) {
            estimate(point)
        } else {
            Ok(Some(f64::NAN))
        }
    };

    #[cfg(not(feature = "use-rayon"))]
    let values: Vec<Option<f64>> = (0..points.ncols()).map(eval).collect::<Result<_>>()?;
    #[cfg(feature = "use-rayon")]
    let values: Vec<Option<f64>> = (0..points.ncols())
        .into_par_iter()
        .map(eval)
        .collect::<Result<_>>()?;

    let unweighted = fill(out, values);
    if unweighted > 0 {
        log::warn!(
            "{} of {} points have no sample with positive kernel weight",
            unweighted,
            points.ncols()
        );
    }
    Ok(())
}

/// Copies estimates into `out`, NaN for missing ones. Returns how many were missing.
fn fill(mut out: ArrayViewMut1<f64>, values: Vec<Option<f64>>) -> usize {
    let mut missing = 0;
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value.unwrap_or_else(|| {
            missing += 1;
            f64::NAN
        });
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fill_counts_missing() {
        let mut out = Array1::zeros(4);
        let missing = fill(out.view_mut(), vec![Some(1.0), None, Some(f64::NAN), None]);
        assert_eq!(missing, 2);
        assert_eq!(out[0], 1.0);
        assert!(out.iter().skip(1).all(|v| v.is_nan()));
    }

    #[test]
    fn test_in_domain_is_inclusive() {
        let lower = array![0.0, -1.0];
        let upper = array![1.0, 1.0];
        assert!(in_domain(array![0.0, 1.0].view(), &lower, &upper));
        assert!(!in_domain(array![0.5, 1.5].view(), &lower, &upper));
    }
}
