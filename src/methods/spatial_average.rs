use ndarray::{ArrayView2, ArrayViewMut1};

use super::{evaluate_points, KernelFit, RegressionMethod};
use crate::error::{NprError, Result};
use crate::regression::RegressionData;

/// Local-constant (Nadaraya-Watson) estimator: kernel-weighted mean of `y`.
#[derive(Debug, Clone, Default)]
pub struct SpatialAverage {
    fit: Option<KernelFit>,
}

impl SpatialAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kernel_fit(&self) -> Option<&KernelFit> {
        self.fit.as_ref()
    }
}

impl RegressionMethod for SpatialAverage {
    fn name(&self) -> &'static str {
        "Spatial Average"
    }

    fn fit(&mut self, data: &RegressionData) -> Result<()> {
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
        evaluate_points(data, fit, points, out, |point| {
            Ok(fit.weighted_mean(fit.weights(point).view()))
        })
    }

    fn box_clone(&self) -> Box<dyn RegressionMethod> {
        Box::new(self.clone())
    }
}
