//! The tuning loop: record laps, request the next vector to drive.


use std::sync::Arc;

use gaptune_core::{
    LapTime, Observation, ObservationStore, ParameterSpace, ParameterVector, Prediction,
    ShapeError, Surrogate,
};
use gaptune_surrogate::GaussianProcess;
use nalgebra::DMatrix;
use tracing::{debug, info, warn};

use crate::{
    Config,
    acquisition::{AcquisitionPolicy, Mode},
    sampler::CandidateSampler,
    storage::{PersistenceError, Storage},
};

/// Standard deviation assumed for every candidate when no model is usable.
const FALLBACK_STD_DEV: f64 = 1.0;

/// Whether the engine trusts its surrogate yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Too few observations; requests are uniform random draws.
    ColdStart,

    /// Requests are chosen by the surrogate and acquisition policy.
    Trained,
}

/// A Bayesian optimization session over one parameter space.
///
/// The engine owns the observation history and the surrogate. It leaves
/// [`Phase::ColdStart`] once the history reaches the configured warmup
/// threshold and never returns to it during the session; only
/// [`Engine::load`] resets the phase from the loaded history.
///
/// The surrogate is refit lazily at the next [`Engine::request`] after new
/// observations arrive, or eagerly after a successful load.
#[derive(Debug)]
pub struct Engine<S: Surrogate = GaussianProcess> {
    space: Arc<ParameterSpace>,
    config: Config,
    store: ObservationStore,
    surrogate: S,
    sampler: CandidateSampler,
    policy: AcquisitionPolicy,
    phase: Phase,
    fitted_on: Option<usize>,
}

impl Engine<GaussianProcess> {
    /// Creates an engine with a Gaussian process surrogate.
    #[must_use]
    pub fn new(space: Arc<ParameterSpace>, config: Config) -> Self {
        let surrogate = GaussianProcess::new(*config.surrogate());
        Self::with_surrogate(space, config, surrogate)
    }
}

impl<S: Surrogate> Engine<S> {
    /// Creates an engine around any surrogate.
    #[must_use]
    pub fn with_surrogate(space: Arc<ParameterSpace>, config: Config, surrogate: S) -> Self {
        // Config validates the weight, unwrap is safe
        let policy = AcquisitionPolicy::new(config.exploration_weight()).unwrap();
        Self {
            store: ObservationStore::new(Arc::clone(&space)),
            sampler: CandidateSampler::new(config.seed()),
            space,
            config,
            surrogate,
            policy,
            phase: Phase::ColdStart,
            fitted_on: None,
        }
    }

    /// Records the outcome of driving `vector`.
    ///
    /// The surrogate is not refit until the next request.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if `vector` belongs to a space of a different
    /// dimensionality. History is unchanged in that case.
    pub fn record(&mut self, vector: ParameterVector, lap_time: LapTime) -> Result<(), ShapeError> {
        debug!(vector = %vector, %lap_time, "recording lap");
        self.store.append(vector, lap_time)?;

        if self.phase == Phase::ColdStart && self.store.len() >= self.config.warmup_threshold() {
            info!(observations = self.store.len(), "warmup complete, surrogate enabled");
            self.phase = Phase::Trained;
        }
        Ok(())
    }

    /// Records the outcome of driving the raw values `values`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if `values` does not have one entry per field.
    pub fn record_values(&mut self, values: &[f64], lap_time: LapTime) -> Result<(), ShapeError> {
        let vector = self.space.vector(values)?;
        self.record(vector, lap_time)
    }

    /// Proposes the next vector to drive.
    ///
    /// Never modifies the history. During cold start this is a single
    /// uniform draw and the surrogate is not touched.
    pub fn request(&mut self, mode: Mode) -> ParameterVector {
        match self.phase {
            Phase::ColdStart => {
                let vector = self.sampler.sample_vector(&self.space);
                debug!(vector = %vector, "cold start draw");
                vector
            }
            Phase::Trained => self.acquire(mode),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the number of recorded observations.
    #[must_use]
    pub fn size(&self) -> usize {
        self.store.size()
    }

    /// Returns the fastest observation, or `None` with empty history.
    #[must_use]
    pub fn best(&self) -> Option<Observation> {
        self.store.best()
    }

    /// Returns the full history.
    #[must_use]
    pub fn history(&self) -> &ObservationStore {
        &self.store
    }

    /// Returns the parameter space.
    #[must_use]
    pub fn space(&self) -> &Arc<ParameterSpace> {
        &self.space
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the surrogate.
    #[must_use]
    pub fn surrogate(&self) -> &S {
        &self.surrogate
    }

    /// Writes the history to `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    pub fn save(&self, storage: &impl Storage) -> Result<(), PersistenceError> {
        storage.save(&self.store)?;
        info!(observations = self.store.len(), "history saved");
        Ok(())
    }

    /// Replaces the history with what `storage` holds.
    ///
    /// The phase is recomputed from the loaded size, and the surrogate is
    /// refit immediately when the history is past warmup. Returns the number
    /// of loaded observations.
    ///
    /// # Errors
    ///
    /// Returns the storage error. The engine is then left with empty history
    /// in cold start and stays usable; check
    /// [`PersistenceError::is_recoverable`] to decide whether to carry on.
    pub fn load(&mut self, storage: &impl Storage) -> Result<usize, PersistenceError> {
        self.fitted_on = None;

        let store = match storage.load(&self.space) {
            Ok(store) => store,
            Err(err) => {
                self.store = ObservationStore::new(Arc::clone(&self.space));
                self.phase = Phase::ColdStart;
                return Err(err);
            }
        };

        self.store = store;
        self.phase = if self.store.len() >= self.config.warmup_threshold() {
            Phase::Trained
        } else {
            Phase::ColdStart
        };
        info!(observations = self.store.len(), phase = ?self.phase, "history loaded");

        if self.phase == Phase::Trained {
            self.refit();
        }
        Ok(self.store.len())
    }

    /// Refits the surrogate unless it already reflects the current history.
    fn refit(&mut self) {
        let observations = self.store.len();
        if self.fitted_on == Some(observations) {
            return;
        }

        let (inputs, targets) = self.store.as_matrix();
        let inputs = self.space.normalize_rows(&inputs);
        match self.surrogate.fit(&inputs, &targets) {
            Ok(()) => debug!(observations, "surrogate refit"),
            Err(err) => warn!(observations, error = %err, "surrogate fit failed, using fallback"),
        }
        self.fitted_on = Some(observations);
    }

    fn acquire(&mut self, mode: Mode) -> ParameterVector {
        self.refit();

        let candidates = self.sampler.sample(&self.space, self.config.batch_size());
        let prediction = self.predict(&candidates);
        let index = self.policy.select(&prediction, mode).unwrap_or(0);

        let row: Vec<f64> = candidates.row(index).iter().copied().collect();
        // Candidate rows have one value per field, unwrap is safe
        let vector = self.space.vector(&row).unwrap();
        debug!(
            ?mode,
            candidate = index,
            predicted = prediction.mean[index],
            std_dev = prediction.std_dev[index],
            vector = %vector,
            "selected candidate"
        );
        vector
    }

    fn predict(&self, candidates: &DMatrix<f64>) -> Prediction {
        let count = candidates.nrows();
        if !self.surrogate.is_fitted() {
            return self.fallback(count);
        }

        match self.surrogate.predict(&self.space.normalize_rows(candidates)) {
            Ok(prediction) if prediction.len() == count => prediction,
            Ok(prediction) => {
                warn!(
                    expected = count,
                    found = prediction.len(),
                    "surrogate returned the wrong number of predictions, using fallback"
                );
                self.fallback(count)
            }
            Err(err) => {
                warn!(error = %err, "surrogate prediction failed, using fallback");
                self.fallback(count)
            }
        }
    }

    /// Every candidate looks alike, so selection takes the first draw.
    #[allow(clippy::cast_precision_loss)]
    fn fallback(&self, count: usize) -> Prediction {
        let laps = self.store.lap_times();
        let mean = if laps.is_empty() {
            0.0
        } else {
            laps.iter().map(|t| t.seconds()).sum::<f64>() / laps.len() as f64
        };
        Prediction::uninformed(count, mean, FALLBACK_STD_DEV)
    }
}
