//! Durable storage for observation history.
//!
//! Only raw history is stored: a parameter matrix and a parallel lap-time
//! vector. The surrogate is never persisted; the engine rebuilds it from the
//! history after loading.

mod error;
mod json_file;

use std::sync::Arc;

use gaptune_core::{ObservationStore, ParameterSpace};

pub use error::PersistenceError;
pub use json_file::JsonFileStorage;

/// A place to save and restore an [`ObservationStore`].
pub trait Storage {
    /// Writes the full history, replacing anything saved before.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be written.
    fn save(&self, store: &ObservationStore) -> Result<(), PersistenceError>;

    /// Reads saved history into a store for vectors of `space`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if nothing has been saved,
    /// [`PersistenceError::Corrupt`] if the saved data is malformed, and
    /// [`PersistenceError::DimensionMismatch`] if it was saved for a space of
    /// a different dimensionality.
    fn load(&self, space: &Arc<ParameterSpace>) -> Result<ObservationStore, PersistenceError>;
}
