//! Kernel-based non-parametric regression.
//!
//! A [`NonParamRegression`] combines a kernel, a bandwidth and a regression
//! method over a scattered dataset. It is fitted once and can then be
//! evaluated at any number of query points.
//!
//! ```no_run
//! use ndarray::array;
//! use npreg::{methods::SpatialAverage, NonParamRegression};
//!
//! let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = array![2.0, 4.0, 6.0, 8.0, 10.0];
//! let mut model = NonParamRegression::builder()
//!     .method(SpatialAverage::new())
//!     .build(&x, &y)?;
//! model.fit()?;
//! let estimate = model.evaluate(&array![3.0])?;
//! println!("f(3) = {estimate}");
//! # Ok::<(), npreg::NprError>(())
//! ```
pub mod bandwidth;
pub mod error;
pub mod kernels;
pub mod linalg;
pub mod methods;
pub mod regression;

#[cfg(test)]
mod test_data;

use ndarray::{Array1, ArrayView2};

pub use error::{NprError, Result};
pub use regression::{NonParamRegression, NonParamRegressionBuilder, RegressionData};

pub trait FittedModel {
    /// Estimates at each column of the `D×M` matrix `x`.
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>>;
}
