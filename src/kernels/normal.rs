use std::f64::consts::PI;
use std::sync::Arc;

use ndarray::{Array1, ArrayView2, Axis};

use super::{Kernel, KernelClass};

/// Standard multivariate normal density in `dim` dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalKernel {
    dim: usize,
    factor: f64,
}

impl NormalKernel {
    pub fn new(dim: usize) -> Self {
        let factor = (2.0 * PI).powf(-(dim as f64) / 2.0);
        NormalKernel { dim, factor }
    }
}

impl Default for NormalKernel {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Kernel for NormalKernel {
    fn pdf(&self, xs: ArrayView2<f64>) -> Array1<f64> {
        xs.map_axis(Axis(0), |col| {
            let sq: f64 = col.iter().map(|v| v * v).sum();
            self.factor * (-0.5 * sq).exp()
        })
    }

    fn dim(&self) -> Option<usize> {
        Some(self.dim)
    }
}

/// Builds a [`NormalKernel`] of the fitted dimension.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalKernelClass;

impl KernelClass for NormalKernelClass {
    fn instantiate(&self, dim: usize) -> Arc<dyn Kernel> {
        Arc::new(NormalKernel::new(dim))
    }
}
