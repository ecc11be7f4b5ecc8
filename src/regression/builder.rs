use std::sync::Arc;

use ndarray::{ArrayBase, ArrayD, Data, Dimension};

use super::NonParamRegression;
use crate::bandwidth::{BandwidthEstimator, BandwidthSpec};
use crate::error::Result;
use crate::kernels::{Kernel, KernelClass, KernelSpec};
use crate::methods::RegressionMethod;

#[derive(Debug, Clone)]
enum BandwidthOption {
    Bandwidth(ArrayD<f64>),
    Covariance(ArrayD<f64>),
    Spec(BandwidthSpec),
}

/// Collects configuration and applies it through the model's setters.
///
/// Later calls for the same concern override earlier ones, so `kernel` and
/// `kernel_class` (or any two bandwidth forms) are never both applied.
#[derive(Debug, Clone, Default)]
pub struct NonParamRegressionBuilder {
    kernel: Option<KernelSpec>,
    bandwidth: Option<BandwidthOption>,
    method: Option<Box<dyn RegressionMethod>>,
    lower: Option<ArrayD<f64>>,
    upper: Option<ArrayD<f64>>,
}

impl NonParamRegressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kernel<K: Kernel + 'static>(mut self, kernel: K) -> Self {
        self.kernel = Some(KernelSpec::instance(kernel));
        self
    }

    pub fn kernel_class<C: KernelClass + 'static>(mut self, class: C) -> Self {
        self.kernel = Some(KernelSpec::class(class));
        self
    }

    pub fn bandwidth<S, D>(mut self, bandwidth: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.bandwidth = Some(BandwidthOption::Bandwidth(bandwidth.to_owned().into_dyn()));
        self
    }

    pub fn bandwidth_fn<E: BandwidthEstimator + 'static>(mut self, estimator: E) -> Self {
        self.bandwidth = Some(BandwidthOption::Spec(BandwidthSpec::BandwidthFn(Arc::new(
            estimator,
        ))));
        self
    }

    pub fn covariance<S, D>(mut self, covariance: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.bandwidth = Some(BandwidthOption::Covariance(covariance.to_owned().into_dyn()));
        self
    }

    pub fn covariance_fn<E: BandwidthEstimator + 'static>(mut self, estimator: E) -> Self {
        self.bandwidth = Some(BandwidthOption::Spec(BandwidthSpec::CovarianceFn(Arc::new(
            estimator,
        ))));
        self
    }

    pub fn method<M: RegressionMethod + 'static>(mut self, method: M) -> Self {
        self.method = Some(Box::new(method));
        self
    }

    pub fn lower<S, D>(mut self, lower: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.lower = Some(lower.to_owned().into_dyn());
        self
    }

    pub fn upper<S, D>(mut self, upper: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.upper = Some(upper.to_owned().into_dyn());
        self
    }

    /// Builds the (unfitted) model. Shape errors in any option are reported here.
    pub fn build<SX, DX, SY, DY>(
        self,
        xdata: &ArrayBase<SX, DX>,
        ydata: &ArrayBase<SY, DY>,
    ) -> Result<NonParamRegression>
    where
        SX: Data<Elem = f64>,
        DX: Dimension,
        SY: Data<Elem = f64>,
        DY: Dimension,
    {
        let mut model = NonParamRegression::new(xdata, ydata)?;
        if let Some(kernel) = self.kernel {
            model.set_kernel_spec(kernel);
        }
        match self.bandwidth {
            Some(BandwidthOption::Bandwidth(bw)) => model.set_bandwidth(&bw)?,
            Some(BandwidthOption::Covariance(cov)) => model.set_covariance(&cov)?,
            Some(BandwidthOption::Spec(spec)) => model.set_bandwidth_spec(spec),
            None => {}
        }
        if let Some(method) = self.method {
            model.set_boxed_method(method);
        }
        if let Some(lower) = self.lower {
            model.set_lower(&lower)?;
        }
        if let Some(upper) = self.upper {
            model.set_upper(&upper)?;
        }
        Ok(model)
    }
}
