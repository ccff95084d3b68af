use thiserror::Error;

/// Configuration for fitting a [`GaussianProcess`](super::GaussianProcess).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    restarts: usize,
    noise: f64,
    max_sweeps: usize,
    sweep_tol: f64,
    seed: Option<u64>,
}

/// Errors that can occur when validating a Gaussian process config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("noise must be finite and positive")]
    Noise,

    #[error("sweep_tol must be finite and non-negative")]
    SweepTol,

    #[error("max_sweeps must be at least one")]
    MaxSweeps,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(10, 0.01).unwrap()
    }
}

impl Config {
    /// Creates a config with the given restart count and observation noise.
    ///
    /// `noise` is added to the covariance diagonal, in units of the
    /// standardized lap-time variance.
    ///
    /// # Errors
    ///
    /// Returns an error if `noise` is not a finite positive number.
    pub fn new(restarts: usize, noise: f64) -> Result<Self, ConfigError> {
        if !noise.is_finite() || noise <= 0.0 {
            return Err(ConfigError::Noise);
        }

        Ok(Self {
            restarts,
            noise,
            max_sweeps: 25,
            sweep_tol: 1e-6,
            seed: None,
        })
    }

    /// Sets the limits of each local hyperparameter search.
    ///
    /// A local search stops after `max_sweeps` coordinate sweeps, or earlier
    /// once a sweep improves the log likelihood by no more than `sweep_tol`.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_sweeps` is zero or `sweep_tol` is negative or
    /// non-finite.
    pub fn with_sweeps(mut self, max_sweeps: usize, sweep_tol: f64) -> Result<Self, ConfigError> {
        if max_sweeps == 0 {
            return Err(ConfigError::MaxSweeps);
        }
        if !sweep_tol.is_finite() || sweep_tol < 0.0 {
            return Err(ConfigError::SweepTol);
        }
        self.max_sweeps = max_sweeps;
        self.sweep_tol = sweep_tol;
        Ok(self)
    }

    /// Fixes the seed used to draw restart points.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the number of random restarts after the initial search.
    #[must_use]
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Returns the observation noise added to the covariance diagonal.
    #[must_use]
    pub fn noise(&self) -> f64 {
        self.noise
    }

    /// Returns the sweep limit of a local search.
    #[must_use]
    pub fn max_sweeps(&self) -> usize {
        self.max_sweeps
    }

    /// Returns the improvement below which a local search stops.
    #[must_use]
    pub fn sweep_tol(&self) -> f64 {
        self.sweep_tol
    }

    /// Returns the restart seed, if fixed.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
