//! Gaussian process regression with restartable maximum-likelihood fitting.
//!
//! # Model
//!
//! Lap times are modeled as a zero-mean Gaussian process over standardized
//! targets with covariance
//!
//! `k(a, b) = c * exp(-|a - b|² / (2 l²)) + noise * δ(a, b)`
//!
//! where the diagonal `noise` term keeps the covariance well-conditioned and
//! accounts for lap-to-lap variation at identical parameters.
//!
//! # Fitting
//!
//! Every [`fit`](Surrogate::fit) re-optimizes `c` and `l` by maximizing the
//! log marginal likelihood. The first local search starts at `c = 1, l = 1`;
//! each of [`Config::restarts`] further searches starts from a random point
//! within the bounds, which lets the fit escape poor local optima. Local
//! searches run cyclic coordinate ascent in log space using
//! [golden section](crate::golden_section) line searches.
//!
//! # Failure
//!
//! Fitting fails with [`FitError`] when the history is degenerate (fewer than
//! two observations, a single distinct vector, non-finite values) or no
//! hyperparameters yield a positive-definite covariance. A failed fit leaves
//! the model unfitted; callers decide how to degrade.

mod config;
mod error;
mod hyperparameters;
mod kernel;
mod likelihood;


pub use config::{Config, ConfigError};
pub use error::FitError;
pub use kernel::Kernel;

use gaptune_core::{Prediction, Surrogate};
use nalgebra::{DMatrix, DVector};
use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use hyperparameters::optimize;
use likelihood::factorize;

/// Targets with a smaller standard deviation are only centered, not scaled.
const MIN_TARGET_SCALE: f64 = 1e-12;

/// A Gaussian process surrogate of lap time.
#[derive(Debug, Clone)]
pub struct GaussianProcess {
    config: Config,
    rng: StdRng,
    fitted: Option<Fitted>,
}

/// Everything needed to predict after a successful fit.
#[derive(Debug, Clone)]
struct Fitted {
    kernel: Kernel,
    inputs: DMatrix<f64>,
    l: DMatrix<f64>,
    alpha: DVector<f64>,
    target_mean: f64,
    target_scale: f64,
    log_likelihood: f64,
}

impl Default for GaussianProcess {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl GaussianProcess {
    /// Creates an unfitted model.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let rng = config
            .seed()
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            config,
            rng,
            fitted: None,
        }
    }

    /// Returns the fitting configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the fitted kernel hyperparameters.
    #[must_use]
    pub fn hyperparameters(&self) -> Option<Kernel> {
        self.fitted.as_ref().map(|f| f.kernel)
    }

    /// Returns the log marginal likelihood of the fitted model, in
    /// standardized target units.
    #[must_use]
    pub fn log_marginal_likelihood(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.log_likelihood)
    }

    fn try_fit(&mut self, inputs: &DMatrix<f64>, targets: &DVector<f64>) -> Result<Fitted, FitError> {
        let n = targets.len();
        if inputs.nrows() != n {
            return Err(FitError::ShapeMismatch {
                expected: n,
                found: inputs.nrows(),
            });
        }
        if n < 2 {
            return Err(FitError::TooFewObservations { found: n });
        }
        if inputs.iter().chain(targets.iter()).any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite);
        }
        if (1..n).all(|row| inputs.row(row) == inputs.row(0)) {
            return Err(FitError::IdenticalInputs);
        }

        let (target_mean, target_scale) = standardization(targets);
        let standardized = targets.map(|y| (y - target_mean) / target_scale);

        let optimum = optimize(inputs, &standardized, &self.config, &mut self.rng)
            .ok_or(FitError::NotPositiveDefinite)?;
        let factorization = factorize(&optimum.kernel, inputs, &standardized, self.config.noise())
            .ok_or(FitError::NotPositiveDefinite)?;

        debug!(
            observations = n,
            constant = optimum.kernel.constant,
            length_scale = optimum.kernel.length_scale,
            log_likelihood = factorization.log_likelihood,
            "fitted gaussian process"
        );

        Ok(Fitted {
            kernel: optimum.kernel,
            inputs: inputs.clone(),
            l: factorization.l,
            alpha: factorization.alpha,
            target_mean,
            target_scale,
            log_likelihood: factorization.log_likelihood,
        })
    }
}

impl Surrogate for GaussianProcess {
    type Error = FitError;

    fn fit(&mut self, inputs: &DMatrix<f64>, targets: &DVector<f64>) -> Result<(), Self::Error> {
        self.fitted = None;
        self.fitted = Some(self.try_fit(inputs, targets)?);
        Ok(())
    }

    fn predict(&self, candidates: &DMatrix<f64>) -> Result<Prediction, Self::Error> {
        let fitted = self.fitted.as_ref().ok_or(FitError::NotFitted)?;
        if candidates.ncols() != fitted.inputs.ncols() {
            return Err(FitError::ShapeMismatch {
                expected: fitted.inputs.ncols(),
                found: candidates.ncols(),
            });
        }

        let cross = fitted.kernel.cross(candidates, &fitted.inputs);
        let mean = (&cross * &fitted.alpha).map(|m| m * fitted.target_scale + fitted.target_mean);

        let v = fitted
            .l
            .solve_lower_triangular(&cross.transpose())
            .ok_or(FitError::NotPositiveDefinite)?;
        let std_dev = DVector::from_fn(candidates.nrows(), |j, _| {
            let explained = v.column(j).norm_squared();
            (fitted.kernel.constant - explained).max(0.0).sqrt() * fitted.target_scale
        });

        Ok(Prediction::new(mean, std_dev))
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}

/// Returns the mean and scale used to standardize targets.
#[allow(clippy::cast_precision_loss)]
fn standardization(targets: &DVector<f64>) -> (f64, f64) {
    let n = targets.len() as f64;
    let mean = targets.mean();
    let variance = targets.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / (n - 1.0).max(1.0);
    let scale = variance.sqrt();
    (mean, if scale > MIN_TARGET_SCALE { scale } else { 1.0 })
}
