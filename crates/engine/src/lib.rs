//! Sequential Bayesian optimization of follow-the-gap parameters.
//!
//! An [`Engine`] alternates with the operator: the car drives the vector
//! returned by [`Engine::request`], then the measured lap goes back in
//! through [`Engine::record`]. Until enough laps are recorded the engine
//! draws uniformly at random; afterwards it fits a surrogate over the whole
//! history and picks the candidate with the lowest
//! `mean - exploration_weight * std_dev` from a fresh random batch.
//!
//! History survives restarts through a [`Storage`] such as
//! [`JsonFileStorage`]. The fitted surrogate is never stored.

mod acquisition;
mod config;
mod engine;
mod sampler;
mod storage;

pub use acquisition::{AcquisitionError, AcquisitionPolicy, Mode};
pub use config::{Config, ConfigError};
pub use engine::{Engine, Phase};
pub use sampler::CandidateSampler;
pub use storage::{JsonFileStorage, PersistenceError, Storage};
