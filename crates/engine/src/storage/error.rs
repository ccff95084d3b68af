use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when saving or loading history.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Nothing has been saved yet.
    #[error("no saved history at {}", path.display())]
    NotFound { path: PathBuf },

    /// The saved data could not be understood.
    #[error("saved history at {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The history file exists but could not be read.
    #[error("cannot read saved history at {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The saved vectors belong to a space with a different dimensionality.
    #[error("saved history has {found} parameters per vector, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Writing failed.
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistenceError {
    /// Returns `true` if the engine can carry on with empty history.
    ///
    /// Missing, corrupt and unreadable files are expected after a first run
    /// or a crash; the operator is warned and tuning starts afresh.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Corrupt { .. } | Self::Unreadable { .. }
        )
    }
}
