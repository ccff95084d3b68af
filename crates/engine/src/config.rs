use gaptune_surrogate::gp;
use thiserror::Error;

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    warmup_threshold: usize,
    exploration_weight: f64,
    batch_size: usize,
    seed: Option<u64>,
    surrogate: gp::Config,
}

/// Errors that can occur when validating an engine config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("warmup_threshold must be at least one")]
    Warmup,

    #[error("exploration_weight must be finite and non-negative")]
    ExplorationWeight,

    #[error("batch_size must be at least one")]
    BatchSize,

    #[error(transparent)]
    Surrogate(#[from] gp::ConfigError),
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(5, 1.0, 1000).unwrap()
    }
}

impl Config {
    /// Creates a config with validated settings.
    ///
    /// - `warmup_threshold`: observations required before the surrogate is
    ///   used; until then requests are uniform random draws
    /// - `exploration_weight`: deviation weight in exploration mode
    /// - `batch_size`: candidates scored per request
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold or batch size is zero, or the weight
    /// is negative or non-finite.
    pub fn new(
        warmup_threshold: usize,
        exploration_weight: f64,
        batch_size: usize,
    ) -> Result<Self, ConfigError> {
        if warmup_threshold == 0 {
            return Err(ConfigError::Warmup);
        }
        if !exploration_weight.is_finite() || exploration_weight < 0.0 {
            return Err(ConfigError::ExplorationWeight);
        }
        if batch_size == 0 {
            return Err(ConfigError::BatchSize);
        }

        Ok(Self {
            warmup_threshold,
            exploration_weight,
            batch_size,
            seed: None,
            surrogate: gp::Config::default(),
        })
    }

    /// Fixes the seed for candidate sampling and hyperparameter restarts.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.surrogate = self.surrogate.with_seed(seed.wrapping_add(1));
        self
    }

    /// Sets the Gaussian process restart count and observation noise.
    ///
    /// # Errors
    ///
    /// Returns an error if `noise` is not a finite positive number.
    pub fn with_surrogate(mut self, restarts: usize, noise: f64) -> Result<Self, ConfigError> {
        let mut surrogate = gp::Config::new(restarts, noise)?;
        if let Some(seed) = self.seed {
            surrogate = surrogate.with_seed(seed.wrapping_add(1));
        }
        self.surrogate = surrogate;
        Ok(self)
    }

    /// Returns the number of observations needed to leave cold start.
    #[must_use]
    pub fn warmup_threshold(&self) -> usize {
        self.warmup_threshold
    }

    /// Returns the exploration weight.
    #[must_use]
    pub fn exploration_weight(&self) -> f64 {
        self.exploration_weight
    }

    /// Returns the number of candidates scored per request.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the sampling seed, if fixed.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the Gaussian process settings.
    #[must_use]
    pub fn surrogate(&self) -> &gp::Config {
        &self.surrogate
    }
}
