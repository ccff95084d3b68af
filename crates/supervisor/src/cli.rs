use std::{fs, io, path::PathBuf, sync::Arc};

use clap::{Parser, ValueEnum};
use gaptune_core::ParameterSpace;
use gaptune_engine::{Config, ConfigError, PersistenceError};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(
    name = "gaptune",
    version,
    about = "Lap-by-lap Bayesian tuning of follow-the-gap parameters"
)]
pub(crate) struct Cli {
    /// History file, loaded at startup and written on save.
    #[arg(long, default_value = "gaptune-history.json")]
    pub(crate) history: PathBuf,

    /// TOML file declaring the parameter space; overrides `--preset`.
    #[arg(long)]
    pub(crate) space: Option<PathBuf>,

    /// Built-in parameter space.
    #[arg(long, value_enum, default_value_t = Preset::V7)]
    pub(crate) preset: Preset,

    /// Laps recorded before the surrogate guides requests.
    #[arg(long, default_value_t = 5)]
    pub(crate) warmup: usize,

    /// Candidates scored per request.
    #[arg(long, default_value_t = 1000)]
    pub(crate) batch_size: usize,

    /// Weight on predicted uncertainty when exploring.
    #[arg(long, default_value_t = 1.0)]
    pub(crate) exploration_weight: f64,

    /// Seed for reproducible sessions.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Preset {
    /// Six parameters with a single speed.
    V6,
    /// Seven parameters with straight and corner speeds.
    V7,
}

/// Errors that stop the supervisor.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to read space file {}", path.display())]
    SpaceFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid space file {}", path.display())]
    SpaceToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid engine settings")]
    Config(#[from] ConfigError),

    #[error("cannot use saved history")]
    Load(#[source] PersistenceError),

    #[error("failed to save history")]
    Save(#[source] PersistenceError),

    #[error("terminal i/o failed")]
    Io(#[from] io::Error),
}

impl Cli {
    /// Resolves the parameter space from `--space` or `--preset`.
    pub(crate) fn parameter_space(&self) -> Result<Arc<ParameterSpace>, AppError> {
        let space = match &self.space {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| AppError::SpaceFile {
                    path: path.clone(),
                    source,
                })?;
                toml::from_str(&text).map_err(|source| AppError::SpaceToml {
                    path: path.clone(),
                    source,
                })?
            }
            None => match self.preset {
                Preset::V6 => ParameterSpace::follow_the_gap_v6(),
                Preset::V7 => ParameterSpace::follow_the_gap_v7(),
            },
        };
        Ok(Arc::new(space))
    }

    /// Builds the engine config from the flags.
    pub(crate) fn engine_config(&self) -> Result<Config, AppError> {
        let config = Config::new(self.warmup, self.exploration_weight, self.batch_size)?;
        Ok(match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        })
    }
}
