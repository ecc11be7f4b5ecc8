//! Compactly supported kernels, rescaled to unit variance so that they share
//! the bandwidth scale of the normal kernel.
//!
//! In more than one dimension they act as product kernels.
use std::sync::Arc;

use ndarray::{Array1, ArrayView2, Axis};

use super::{Kernel, KernelClass};

fn product_pdf<F: Fn(f64) -> f64>(xs: ArrayView2<f64>, profile: F) -> Array1<f64> {
    xs.map_axis(Axis(0), |col| col.iter().map(|&v| profile(v)).product())
}

/// Epanechnikov kernel, support `[-√5, √5]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Epanechnikov;

impl Epanechnikov {
    pub fn pdf_1d(x: f64) -> f64 {
        let bound = 5f64.sqrt();
        if x.abs() > bound {
            0.0
        } else {
            3.0 / (4.0 * bound) * (1.0 - x * x / 5.0)
        }
    }
}

impl Kernel for Epanechnikov {
    fn pdf(&self, xs: ArrayView2<f64>) -> Array1<f64> {
        product_pdf(xs, Self::pdf_1d)
    }
}

impl KernelClass for Epanechnikov {
    fn instantiate(&self, _dim: usize) -> Arc<dyn Kernel> {
        Arc::new(*self)
    }
}

/// Tricube kernel `70/81 (1 - |u|³)³`, stretched to unit variance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tricube;

impl Tricube {
    // sqrt(243 / 35): standard deviation of the unscaled tricube
    const SCALE: f64 = 2.634_930_196_961_04;

    pub fn pdf_1d(x: f64) -> f64 {
        let u = (x / Self::SCALE).abs();
        if u >= 1.0 {
            0.0
        } else {
            70.0 / 81.0 * (1.0 - u * u * u).powi(3) / Self::SCALE
        }
    }
}

impl Kernel for Tricube {
    fn pdf(&self, xs: ArrayView2<f64>) -> Array1<f64> {
        product_pdf(xs, Self::pdf_1d)
    }
}

impl KernelClass for Tricube {
    fn instantiate(&self, _dim: usize) -> Arc<dyn Kernel> {
        Arc::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // Midpoint rule over [-4, 4], wide enough for both supports.
    fn moments(f: fn(f64) -> f64) -> (f64, f64) {
        let n = 200_000;
        let h = 8.0 / n as f64;
        (0..n)
            .map(|i| -4.0 + (i as f64 + 0.5) * h)
            .fold((0.0, 0.0), |(m0, m2), x| {
                let v = f(x) * h;
                (m0 + v, m2 + x * x * v)
            })
    }

    #[test]
    fn test_epanechnikov_unit_mass_and_variance() {
        let (mass, var) = moments(Epanechnikov::pdf_1d);
        assert_abs_diff_eq!(mass, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(var, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tricube_unit_mass_and_variance() {
        let (mass, var) = moments(Tricube::pdf_1d);
        assert_abs_diff_eq!(mass, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(var, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_outside_support_is_zero() {
        assert_eq!(Epanechnikov::pdf_1d(2.3), 0.0);
        assert_eq!(Tricube::pdf_1d(-2.7), 0.0);
        let xs = ndarray::array![[0.0, 0.0], [0.0, 3.0]];
        let pdf = Epanechnikov.pdf(xs.view());
        assert!(pdf[0] > 0.0);
        assert_eq!(pdf[1], 0.0);
    }
}
