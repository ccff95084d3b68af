use thiserror::Error;

/// Stopping rules for a golden section line search.
///
/// The search stops once the bracket is no wider than `tolerance`, or after
/// `max_iters` shrink steps. Tolerance is absolute: line searches here run
/// over log-scaled hyperparameters, where a fixed width means a fixed ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    tolerance: f64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("line search tolerance must be finite and non-negative, got {0}")]
    Tolerance(f64),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 60,
            tolerance: 1e-6,
        }
    }
}

impl Config {
    /// Creates a config.
    ///
    /// # Errors
    ///
    /// Returns an error if `tolerance` is negative or non-finite.
    pub fn new(max_iters: usize, tolerance: f64) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Tolerance(tolerance));
        }
        Ok(Self {
            max_iters,
            tolerance,
        })
    }

    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub(super) fn is_converged(&self, width: f64) -> bool {
        width <= self.tolerance
    }
}
