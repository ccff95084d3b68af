use std::{
    ffi::OsString,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use gaptune_core::{LapTime, ObservationStore, ParameterSpace};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PersistenceError, Storage};

/// On-disk layout: two parallel sequences and nothing else.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SavedHistory {
    params: Vec<Vec<f64>>,
    laptimes: Vec<f64>,
}

/// Stores history as a JSON file.
///
/// Saves write a sibling temporary file and rename it over the target, so a
/// crash mid-write leaves the previous file intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Creates storage backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the history file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("history"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> PersistenceError {
        PersistenceError::Corrupt {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn write_atomically(&self, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        let written =
            write_synced(&temp, contents).and_then(|()| fs::rename(&temp, &self.path));
        if written.is_err() {
            let _ = fs::remove_file(&temp);
        }
        written
    }
}

fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

impl Storage for JsonFileStorage {
    fn save(&self, store: &ObservationStore) -> Result<(), PersistenceError> {
        let saved = SavedHistory {
            params: store.vectors().iter().map(|v| v.to_array()).collect(),
            laptimes: store.lap_times().iter().map(|t| t.seconds()).collect(),
        };
        let json = serde_json::to_vec_pretty(&saved)
            .map_err(|e| self.io_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        self.write_atomically(&json).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), observations = store.len(), "saved history");
        Ok(())
    }

    fn load(&self, space: &Arc<ParameterSpace>) -> Result<ObservationStore, PersistenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PersistenceError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(self.corrupt("file is not valid UTF-8"));
            }
            Err(source) => {
                return Err(PersistenceError::Unreadable {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let saved: SavedHistory =
            serde_json::from_str(&text).map_err(|e| self.corrupt(e.to_string()))?;

        if saved.params.len() != saved.laptimes.len() {
            return Err(self.corrupt(format!(
                "{} parameter rows but {} lap times",
                saved.params.len(),
                saved.laptimes.len()
            )));
        }

        if let Some(first) = saved.params.first() {
            if saved.params.iter().any(|row| row.len() != first.len()) {
                return Err(self.corrupt("parameter rows have different lengths"));
            }
            if first.len() != space.dim() {
                return Err(PersistenceError::DimensionMismatch {
                    expected: space.dim(),
                    found: first.len(),
                });
            }
        }

        let mut store = ObservationStore::new(Arc::clone(space));
        for (index, (row, seconds)) in saved.params.iter().zip(saved.laptimes).enumerate() {
            if row.iter().any(|v| !v.is_finite()) {
                return Err(self.corrupt(format!("row {index} has a non-finite value")));
            }
            let lap_time = LapTime::from_seconds(seconds)
                .map_err(|e| self.corrupt(format!("row {index}: {e}")))?;
            let vector = space
                .vector(row)
                .map_err(|e| self.corrupt(format!("row {index}: {e}")))?;
            store
                .append(vector, lap_time)
                .map_err(|e| self.corrupt(format!("row {index}: {e}")))?;
        }

        debug!(path = %self.path.display(), observations = store.len(), "loaded history");
        Ok(store)
    }
}
