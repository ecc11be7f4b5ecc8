//! Kernel functions used to weight observations around a query point.
//!
//! A [`Kernel`] maps offsets, already scaled by the inverse bandwidth, to
//! densities. Some kernels depend on the dimension of the domain; those are
//! described by a [`KernelClass`] that is instantiated once the dimension is
//! known, at fit time.
use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, ArrayView2};

mod compact;
mod normal;

pub use compact::{Epanechnikov, Tricube};
pub use normal::{NormalKernel, NormalKernelClass};

/// Density function `K(x)`.
///
/// Implementations should be symmetric and integrate to one, which is what
/// the bandwidth rules assume. Nothing checks it.
pub trait Kernel: fmt::Debug + Send + Sync {
    /// Density at each column of `xs` (a `D×M` matrix of scaled offsets).
    fn pdf(&self, xs: ArrayView2<f64>) -> Array1<f64>;

    /// Dimension the kernel was built for, `None` if it accepts any.
    fn dim(&self) -> Option<usize> {
        None
    }
}

/// Factory for kernels whose form depends on the domain dimension.
pub trait KernelClass: fmt::Debug + Send + Sync {
    fn instantiate(&self, dim: usize) -> Arc<dyn Kernel>;
}

/// Either a concrete kernel or a kernel class, never both.
///
/// Clones share the underlying kernel: kernels are immutable once built.
#[derive(Debug, Clone)]
pub enum KernelSpec {
    Instance(Arc<dyn Kernel>),
    Class(Arc<dyn KernelClass>),
}

impl KernelSpec {
    pub fn instance<K: Kernel + 'static>(kernel: K) -> Self {
        KernelSpec::Instance(Arc::new(kernel))
    }

    pub fn class<C: KernelClass + 'static>(class: C) -> Self {
        KernelSpec::Class(Arc::new(class))
    }

    /// Concrete kernel for a domain of dimension `dim`.
    pub fn resolve(&self, dim: usize) -> Arc<dyn Kernel> {
        match self {
            KernelSpec::Instance(kernel) => Arc::clone(kernel),
            KernelSpec::Class(class) => class.instantiate(dim),
        }
    }
}

impl Default for KernelSpec {
    fn default() -> Self {
        KernelSpec::class(NormalKernelClass)
    }
}
