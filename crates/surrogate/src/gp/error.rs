use thiserror::Error;

/// Errors that can occur when fitting or querying a Gaussian process.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FitError {
    /// Fewer than two observations were provided.
    #[error("need at least two observations to fit, found {found}")]
    TooFewObservations { found: usize },

    /// Every observation was taken at the same parameter vector.
    #[error("all observations share the same parameter vector")]
    IdenticalInputs,

    /// Row or column counts do not line up.
    #[error("expected {expected} entries, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    /// An input or target was NaN or infinite.
    #[error("inputs and targets must be finite")]
    NonFinite,

    /// No hyperparameters produced a positive-definite covariance.
    #[error("covariance matrix is not positive definite")]
    NotPositiveDefinite,

    /// Prediction was requested before a successful fit.
    #[error("model has not been fitted")]
    NotFitted,
}
