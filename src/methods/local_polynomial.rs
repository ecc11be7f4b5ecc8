use itertools::Itertools;
use ndarray::{Array1, Array2, ArrayView2, ArrayViewMut1, Axis};

use super::{evaluate_points, KernelFit, RegressionMethod};
use crate::error::{NprError, Result};
use crate::linalg;
use crate::regression::RegressionData;

/// Local polynomial estimator of degree `q` in any dimension.
///
/// At each query point a weighted least-squares fit of every monomial of the
/// scaled offsets with total degree at most `q` is solved; the intercept is
/// the estimate. `q = 0` is the local-constant estimator and `q = 1` the
/// local-linear one.
///
/// When the local design cannot identify every coefficient (fewer samples
/// with positive weight than monomials, or samples lying on a lower
/// dimensional set) the estimate falls back to the kernel-weighted mean.
#[derive(Debug, Clone)]
pub struct LocalPolynomialKernel {
    q: usize,
    fit: Option<PolynomialFit>,
}

#[derive(Debug, Clone)]
struct PolynomialFit {
    kernel_fit: KernelFit,
    exponents: Vec<Vec<usize>>,
}

impl LocalPolynomialKernel {
    pub fn new(q: usize) -> Self {
        LocalPolynomialKernel { q, fit: None }
    }

    pub fn q(&self) -> usize {
        self.q
    }

    /// Exponents of the monomials of degree at most `q` in `dim` variables,
    /// the constant term first.
    pub fn exponents(q: usize, dim: usize) -> Vec<Vec<usize>> {
        let mut exponents: Vec<Vec<usize>> = (0..dim)
            .map(|_| 0..=q)
            .multi_cartesian_product()
            .filter(|e| e.iter().sum::<usize>() <= q)
            .collect();
        exponents.sort_by_key(|e| e.iter().sum::<usize>());
        exponents
    }
}

impl Default for LocalPolynomialKernel {
    fn default() -> Self {
        Self::new(1)
    }
}

fn design_matrix(offsets: ArrayView2<f64>, exponents: &[Vec<usize>]) -> Array2<f64> {
    Array2::from_shape_fn((offsets.ncols(), exponents.len()), |(i, k)| {
        exponents[k]
            .iter()
            .enumerate()
            .map(|(d, &e)| offsets[[d, i]].powi(e as i32))
            .product()
    })
}

impl RegressionMethod for LocalPolynomialKernel {
    fn name(&self) -> &'static str {
        "Local Polynomial"
    }

    fn fit(&mut self, data: &RegressionData) -> Result<()> {
        let kernel_fit = KernelFit::new(data)?;
        let exponents = Self::exponents(self.q, data.xdata().nrows());
        log::debug!(
            "Local polynomial of degree {} uses {} terms",
            self.q,
            exponents.len()
        );
        self.fit = Some(PolynomialFit {
            kernel_fit,
            exponents,
        });
        Ok(())
    }

    fn evaluate(
        &self,
        data: &RegressionData,
        points: ArrayView2<f64>,
        out: ArrayViewMut1<f64>,
    ) -> Result<()> {
        let fit = self.fit.as_ref().ok_or(NprError::NotFitted)?;
        let kernel_fit = &fit.kernel_fit;
        let ydata = kernel_fit.ydata();
        let terms = fit.exponents.len();
        evaluate_points(data, kernel_fit, points, out, |point| {
            let offsets = kernel_fit.offsets(point);
            let w = kernel_fit.kernel.pdf(offsets.view());

            let active: Vec<usize> = w
                .indexed_iter()
                .filter(|(_, &w)| w > 0.0)
                .map(|(i, _)| i)
                .collect();
            if active.is_empty() {
                return Ok(None);
            }
            if active.len() < terms {
                return Ok(kernel_fit.weighted_mean(w.view()));
            }

            let sqrt_w: Array1<f64> = w.select(Axis(0), &active).mapv(f64::sqrt);
            let local = offsets.select(Axis(1), &active);
            let design = design_matrix(local.view(), &fit.exponents)
                * &sqrt_w.view().insert_axis(Axis(1));
            let rhs = &ydata.select(Axis(0), &active) * &sqrt_w;

            match linalg::lstsq(design.view(), rhs.view())? {
                Some(beta) => Ok(Some(beta[0])),
                None => Ok(kernel_fit.weighted_mean(w.view())),
            }
        })
    }

    fn box_clone(&self) -> Box<dyn RegressionMethod> {
        Box::new(self.clone())
    }
}
