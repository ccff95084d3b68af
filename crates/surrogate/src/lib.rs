//! Surrogate models of lap time for the gaptune engine.
//!
//! - [`gp`]: Gaussian process regression whose kernel hyperparameters are
//!   re-fitted by restartable maximum likelihood on every fit
//! - [`golden_section`]: the derivative-free line search used inside the
//!   hyperparameter fit
//!
//! [`GaussianProcess`] implements [`gaptune_core::Surrogate`] and is the
//! engine's default model.

pub mod golden_section;
pub mod gp;

pub use gp::{FitError, GaussianProcess, Kernel};
