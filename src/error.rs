//! Error types for kernel regression.

/// Errors raised while configuring, fitting or evaluating a regression.
#[derive(Debug, thiserror::Error)]
pub enum NprError {
    /// An input array has an incompatible rank.
    #[error("{what} must be at most {expected}-dimensional, got {found} dimensions")]
    Shape {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Two sizes that must agree do not.
    #[error("{what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// An array could not be reshaped.
    #[error(transparent)]
    Layout(#[from] ndarray::ShapeError),

    /// The model was queried before a successful call to `fit`.
    #[error("The regression has not been fitted yet")]
    NotFitted,

    /// Not enough samples to run the requested computation.
    #[error("At least {needed} samples are required, found {found}")]
    InsufficientData { needed: usize, found: usize },

    /// Bandwidth or covariance is not usable (non-finite, not positive definite, ...).
    #[error("Invalid bandwidth: {0}")]
    InvalidBandwidth(String),

    /// The bandwidth matrix cannot be inverted.
    #[error("Bandwidth matrix is singular")]
    SingularMatrix,

    /// The local least-squares system could not be solved.
    #[error("Failed to solve local system: {0}")]
    Solver(&'static str),

    /// The method cannot handle this kind of data.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Result type for kernel regression
pub type Result<T> = std::result::Result<T, NprError>;
