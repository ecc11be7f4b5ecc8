use ndarray::{ArrayView2, ArrayViewMut1, Zip};

use super::{evaluate_points, KernelFit, RegressionMethod};
use crate::error::{NprError, Result};
use crate::regression::RegressionData;

/// Closed-form local-linear estimator for one-dimensional domains.
///
/// Where the local design is degenerate (all weight on a single abscissa)
/// the estimate falls back to the weighted mean.
#[derive(Debug, Clone, Default)]
pub struct LocalLinearKernel1D {
    fit: Option<KernelFit>,
}

impl LocalLinearKernel1D {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegressionMethod for LocalLinearKernel1D {
    fn name(&self) -> &'static str {
        "Local Linear"
    }

    fn fit(&mut self, data: &RegressionData) -> Result<()> {
        let dim = data.xdata().nrows();
        if dim != 1 {
            return Err(NprError::Unsupported(format!(
                "local linear 1D method on a {dim}-dimensional domain"
            )));
        }
        self.fit = Some(KernelFit::new(data)?);
        Ok(())
    }

    fn evaluate(
        &self,
        data: &RegressionData,
        points: ArrayView2<f64>,
        out: ArrayViewMut1<f64>,
    ) -> Result<()> {
        let fit = self.fit.as_ref().ok_or(NprError::NotFitted)?;
        let ydata = fit.ydata();
        evaluate_points(data, fit, points, out, |point| {
            let offsets = fit.offsets(point);
            let w = fit.kernel.pdf(offsets.view());
            let dx = offsets.row(0);

            let [mut s0, mut s1, mut s2, mut t0, mut t1] = [0.0; 5];
            Zip::from(&w).and(&dx).and(&ydata).for_each(|&w, &dx, &y| {
                s0 += w;
                s1 += w * dx;
                s2 += w * dx * dx;
                t0 += w * y;
                t1 += w * dx * y;
            });

            if s0 <= 0.0 {
                return Ok(None);
            }
            let denom = s0 * s2 - s1 * s1;
            if denom.abs() <= f64::EPSILON * s0 * s2 {
                return Ok(Some(t0 / s0));
            }
            Ok(Some((s2 * t0 - s1 * t1) / denom))
        })
    }

    fn box_clone(&self) -> Box<dyn RegressionMethod> {
        Box::new(self.clone())
    }
}
