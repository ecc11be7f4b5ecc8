//! The regression model: dataset, domain bounds and configuration, with
//! fitting and evaluation delegated to a [`RegressionMethod`].
use std::sync::Arc;

use ndarray::{
    Array1, Array2, ArrayBase, ArrayD, ArrayView1, ArrayView2, ArrayViewMut, ArrayViewMut1, Data,
    Dimension, Ix1, Ix2, IxDyn,
};

use crate::bandwidth::{coerce_matrix, BandwidthEstimator, BandwidthSpec};
use crate::error::{NprError, Result};
use crate::kernels::{Kernel, KernelClass, KernelSpec};
use crate::methods::{default_method, RegressionMethod};
use crate::FittedModel;

mod builder;

pub use builder::NonParamRegressionBuilder;

/// Data and configuration a [`RegressionMethod`] reads during fit and evaluation.
#[derive(Debug, Clone)]
pub struct RegressionData {
    xdata: Array2<f64>,
    ydata: Array1<f64>,
    kernel: KernelSpec,
    bandwidth: BandwidthSpec,
    lower: Option<Array1<f64>>,
    upper: Option<Array1<f64>>,
}

impl RegressionData {
    /// Sample points, `D×N`.
    pub fn xdata(&self) -> ArrayView2<f64> {
        self.xdata.view()
    }

    pub fn ydata(&self) -> ArrayView1<f64> {
        self.ydata.view()
    }

    pub fn kernel_spec(&self) -> &KernelSpec {
        &self.kernel
    }

    pub fn bandwidth_spec(&self) -> &BandwidthSpec {
        &self.bandwidth
    }

    /// Lower bound per dimension, `-inf` everywhere when unset.
    pub fn lower(&self) -> Array1<f64> {
        self.lower
            .clone()
            .unwrap_or_else(|| Array1::from_elem(self.xdata.nrows(), f64::NEG_INFINITY))
    }

    /// Upper bound per dimension, `+inf` everywhere when unset.
    pub fn upper(&self) -> Array1<f64> {
        self.upper
            .clone()
            .unwrap_or_else(|| Array1::from_elem(self.xdata.nrows(), f64::INFINITY))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FitInfo {
    n: usize,
    dim: usize,
}

/// Kernel-based non-parametric regression.
///
/// The computation is split in three parts: the kernel, the bandwidth (or
/// covariance) and the regression method. Any change of data or
/// configuration discards the fit; [`fit`](Self::fit) must be called again
/// before evaluating.
#[derive(Debug, Clone)]
pub struct NonParamRegression {
    data: RegressionData,
    method: Box<dyn RegressionMethod>,
    fitted: Option<FitInfo>,
}

/// `xdata` as a `D×N` matrix; a vector is a single row of 1-D points.
fn coerce_xdata<S, D>(xdata: &ArrayBase<S, D>) -> Result<Array2<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let xdata = xdata.view().into_dyn();
    match xdata.ndim() {
        0 | 1 => Ok(Array2::from_shape_vec(
            (1, xdata.len()),
            xdata.iter().copied().collect(),
        )?),
        2 => Ok(xdata.into_dimensionality::<Ix2>()?.to_owned()),
        found => Err(NprError::Shape {
            what: "xdata",
            expected: 2,
            found,
        }),
    }
}

fn coerce_vector<S, D>(what: &'static str, v: &ArrayBase<S, D>) -> Result<Array1<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let v = v.view().into_dyn();
    match v.ndim() {
        0 => Ok(v.iter().copied().collect()),
        1 => Ok(v.into_dimensionality::<Ix1>()?.to_owned()),
        found => Err(NprError::Shape {
            what,
            expected: 1,
            found,
        }),
    }
}

impl NonParamRegression {
    /// Model with the default kernel class, bandwidth rule and method.
    ///
    /// `xdata` is promoted to a `D×N` matrix (a scalar or vector becomes a
    /// single row); `ydata` to a vector. Higher ranks are rejected. Sample
    /// counts are only compared by [`fit`](Self::fit).
    pub fn new<SX, DX, SY, DY>(
        xdata: &ArrayBase<SX, DX>,
        ydata: &ArrayBase<SY, DY>,
    ) -> Result<Self>
    where
        SX: Data<Elem = f64>,
        DX: Dimension,
        SY: Data<Elem = f64>,
        DY: Dimension,
    {
        Ok(NonParamRegression {
            data: RegressionData {
                xdata: coerce_xdata(xdata)?,
                ydata: coerce_vector("ydata", ydata)?,
                kernel: KernelSpec::default(),
                bandwidth: BandwidthSpec::default(),
                lower: None,
                upper: None,
            },
            method: default_method(),
            fitted: None,
        })
    }

    pub fn builder() -> NonParamRegressionBuilder {
        NonParamRegressionBuilder::new()
    }

    /// Independent copy of the model, fitted state included.
    ///
    /// Arrays and the method are deep-copied. Kernels and bandwidth
    /// estimators are immutable and stay shared between both copies.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn data(&self) -> &RegressionData {
        &self.data
    }

    pub fn xdata(&self) -> ArrayView2<f64> {
        self.data.xdata()
    }

    pub fn set_xdata<S, D>(&mut self, xdata: &ArrayBase<S, D>) -> Result<()>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.data.xdata = coerce_xdata(xdata)?;
        self.fitted = None;
        Ok(())
    }

    pub fn ydata(&self) -> ArrayView1<f64> {
        self.data.ydata()
    }

    pub fn set_ydata<S, D>(&mut self, ydata: &ArrayBase<S, D>) -> Result<()>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.data.ydata = coerce_vector("ydata", ydata)?;
        self.fitted = None;
        Ok(())
    }

    pub fn kernel_spec(&self) -> &KernelSpec {
        &self.data.kernel
    }

    pub fn set_kernel_spec(&mut self, kernel: KernelSpec) {
        self.data.kernel = kernel;
        self.fitted = None;
    }

    /// Concrete kernel, if one was set instead of a kernel class.
    pub fn kernel(&self) -> Option<&Arc<dyn Kernel>> {
        match &self.data.kernel {
            KernelSpec::Instance(kernel) => Some(kernel),
            KernelSpec::Class(_) => None,
        }
    }

    pub fn set_kernel<K: Kernel + 'static>(&mut self, kernel: K) {
        self.set_kernel_spec(KernelSpec::instance(kernel));
    }

    pub fn kernel_class(&self) -> Option<&Arc<dyn KernelClass>> {
        match &self.data.kernel {
            KernelSpec::Class(class) => Some(class),
            KernelSpec::Instance(_) => None,
        }
    }

    pub fn set_kernel_class<C: KernelClass + 'static>(&mut self, class: C) {
        self.set_kernel_spec(KernelSpec::class(class));
    }

    pub fn bandwidth_spec(&self) -> &BandwidthSpec {
        &self.data.bandwidth
    }

    pub fn set_bandwidth_spec(&mut self, bandwidth: BandwidthSpec) {
        self.data.bandwidth = bandwidth;
        self.fitted = None;
    }

    /// Fixed bandwidth, if that is the current bandwidth form.
    pub fn bandwidth(&self) -> Option<&Array2<f64>> {
        match &self.data.bandwidth {
            BandwidthSpec::Bandwidth(bw) => Some(bw),
            _ => None,
        }
    }

    /// Sets a fixed bandwidth: a scalar, a diagonal given as a vector, or a
    /// full `D×D` matrix.
    pub fn set_bandwidth<S, D>(&mut self, bandwidth: &ArrayBase<S, D>) -> Result<()>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let bw = coerce_matrix("bandwidth", bandwidth.to_owned())?;
        self.set_bandwidth_spec(BandwidthSpec::Bandwidth(bw));
        Ok(())
    }

    /// Bandwidth recomputed from `xdata` on every fit.
    pub fn set_bandwidth_fn<E: BandwidthEstimator + 'static>(&mut self, estimator: E) {
        self.set_bandwidth_spec(BandwidthSpec::BandwidthFn(Arc::new(estimator)));
    }

    /// Fixed covariance, if that is the current bandwidth form.
    pub fn covariance(&self) -> Option<&Array2<f64>> {
        match &self.data.bandwidth {
            BandwidthSpec::Covariance(cov) => Some(cov),
            _ => None,
        }
    }

    pub fn set_covariance<S, D>(&mut self, covariance: &ArrayBase<S, D>) -> Result<()>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let cov = coerce_matrix("covariance", covariance.to_owned())?;
        self.set_bandwidth_spec(BandwidthSpec::Covariance(cov));
        Ok(())
    }

    /// Covariance recomputed from `xdata` on every fit.
    pub fn set_covariance_fn<E: BandwidthEstimator + 'static>(&mut self, estimator: E) {
        self.set_bandwidth_spec(BandwidthSpec::CovarianceFn(Arc::new(estimator)));
    }

    pub fn lower(&self) -> Array1<f64> {
        self.data.lower()
    }

    pub fn set_lower<S, D>(&mut self, lower: &ArrayBase<S, D>) -> Result<()>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.data.lower = Some(coerce_vector("lower bound", lower)?);
        self.fitted = None;
        Ok(())
    }

    pub fn clear_lower(&mut self) {
        self.data.lower = None;
        self.fitted = None;
    }

    pub fn upper(&self) -> Array1<f64> {
        self.data.upper()
    }

    pub fn set_upper<S, D>(&mut self, upper: &ArrayBase<S, D>) -> Result<()>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.data.upper = Some(coerce_vector("upper bound", upper)?);
        self.fitted = None;
        Ok(())
    }

    pub fn clear_upper(&mut self) {
        self.data.upper = None;
        self.fitted = None;
    }

    pub fn method(&self) -> &dyn RegressionMethod {
        self.method.as_ref()
    }

    pub fn set_method<M: RegressionMethod + 'static>(&mut self, method: M) {
        self.set_boxed_method(Box::new(method));
    }

    pub fn set_boxed_method(&mut self, method: Box<dyn RegressionMethod>) {
        self.method = method;
        self.fitted = None;
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Number of samples used by the last fit.
    pub fn n(&self) -> Result<usize> {
        self.fitted.map(|info| info.n).ok_or(NprError::NotFitted)
    }

    /// Dimension of the domain used by the last fit.
    pub fn dim(&self) -> Result<usize> {
        self.fitted.map(|info| info.dim).ok_or(NprError::NotFitted)
    }

    /// Fits the method to the current data and configuration.
    ///
    /// Unset bounds are unbounded vectors with one entry per dimension of the
    /// domain. Errors from the method are returned unchanged and leave the
    /// model unfitted.
    pub fn fit(&mut self) -> Result<()> {
        self.fitted = None;
        let (dim, n) = self.data.xdata.dim();
        if self.data.ydata.len() != n {
            return Err(NprError::DimensionMismatch {
                what: "ydata length",
                expected: n,
                found: self.data.ydata.len(),
            });
        }
        if n == 0 {
            return Err(NprError::InsufficientData { needed: 1, found: 0 });
        }
        let bounds = [
            ("lower bound length", &self.data.lower),
            ("upper bound length", &self.data.upper),
        ];
        for (what, bound) in bounds {
            if let Some(bound) = bound {
                if bound.len() != dim {
                    return Err(NprError::DimensionMismatch {
                        what,
                        expected: dim,
                        found: bound.len(),
                    });
                }
            }
        }

        log::debug!(
            "Fitting {} on {} samples of dimension {}",
            self.method.name(),
            n,
            dim
        );
        self.method.fit(&self.data)?;
        self.fitted = Some(FitInfo { n, dim });
        Ok(())
    }

    /// Evaluates the fitted regression.
    ///
    /// A scalar is a single 1-D point and gives a 0-dimensional result; a
    /// vector of length `M` holds `M` 1-D points; a `D×M` matrix holds one
    /// point per column. Both give a vector of length `M`.
    pub fn evaluate<S, D>(&self, points: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let query = self.query_points(points)?;
        let mut out = Array1::zeros(query.ncols());
        self.evaluate_points(query.view(), out.view_mut())?;
        if points.ndim() == 0 {
            Ok(out.into_shape_with_order(IxDyn(&[]))?)
        } else {
            Ok(out.into_dyn())
        }
    }

    /// Like [`evaluate`](Self::evaluate), writing into a caller-provided
    /// buffer holding `M` elements. The buffer may have any shape that can be
    /// read as a contiguous vector of length `M`.
    pub fn evaluate_into<S, D, E>(
        &self,
        points: &ArrayBase<S, D>,
        out: ArrayViewMut<f64, E>,
    ) -> Result<()>
    where
        S: Data<Elem = f64>,
        D: Dimension,
        E: Dimension,
    {
        let query = self.query_points(points)?;
        if out.len() != query.ncols() {
            return Err(NprError::DimensionMismatch {
                what: "output buffer length",
                expected: query.ncols(),
                found: out.len(),
            });
        }
        let out = if out.ndim() == 1 {
            out.into_dimensionality::<Ix1>()?
        } else {
            let len = out.len();
            out.into_shape_with_order(len)?
        };
        self.evaluate_points(query.view(), out)
    }

    fn query_points<S, D>(&self, points: &ArrayBase<S, D>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        if points.ndim() > 2 {
            return Err(NprError::Shape {
                what: "evaluation points",
                expected: 2,
                found: points.ndim(),
            });
        }
        coerce_xdata(points)
    }

    fn evaluate_points(&self, points: ArrayView2<f64>, out: ArrayViewMut1<f64>) -> Result<()> {
        let info = self.fitted.ok_or(NprError::NotFitted)?;
        if points.nrows() != info.dim {
            return Err(NprError::DimensionMismatch {
                what: "evaluation point dimension",
                expected: info.dim,
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
        log::trace!("Evaluating {} points", points.ncols());
        self.method.evaluate(&self.data, points, out)
    }
}

impl FittedModel for NonParamRegression {
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        let mut out = Array1::zeros(x.ncols());
        self.evaluate_points(x, out.view_mut())?;
        Ok(out)
    }
}
