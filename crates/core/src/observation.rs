use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::{
    lap_time::LapTime,
    space::ParameterSpace,
    vector::{ParameterVector, ShapeError},
};

/// One tested vector and the lap it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Position in the history, starting at zero.
    pub index: usize,

    /// The parameters the car drove with.
    pub vector: ParameterVector,

    /// The measured outcome.
    pub lap_time: LapTime,
}

/// Append-only history of tested vectors, in the order they were driven.
///
/// Vectors and lap times are kept as two parallel sequences that always
/// have the same length.
#[derive(Debug, Clone)]
pub struct ObservationStore {
    space: Arc<ParameterSpace>,
    vectors: Vec<ParameterVector>,
    lap_times: Vec<LapTime>,
}

impl ObservationStore {
    /// Creates an empty store for vectors of `space`.
    #[must_use]
    pub fn new(space: Arc<ParameterSpace>) -> Self {
        Self {
            space,
            vectors: Vec::new(),
            lap_times: Vec::new(),
        }
    }

    /// Returns the space every stored vector belongs to.
    #[must_use]
    pub fn space(&self) -> &Arc<ParameterSpace> {
        &self.space
    }

    /// Appends an observation.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if the vector has a different dimensionality
    /// than this store's space.
    pub fn append(&mut self, vector: ParameterVector, lap_time: LapTime) -> Result<(), ShapeError> {
        if vector.space().dim() != self.space.dim() {
            return Err(ShapeError {
                expected: self.space.dim(),
                found: vector.space().dim(),
            });
        }
        self.vectors.push(vector);
        self.lap_times.push(lap_time);
        Ok(())
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lap_times.len()
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lap_times.is_empty()
    }

    /// Returns the observation at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Observation> {
        let vector = self.vectors.get(index)?;
        Some(Observation {
            index,
            vector: vector.clone(),
            lap_time: self.lap_times[index],
        })
    }

    /// Iterates over the observations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Observation> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }

    /// Returns the stored vectors in insertion order.
    #[must_use]
    pub fn vectors(&self) -> &[ParameterVector] {
        &self.vectors
    }

    /// Returns the stored lap times in insertion order.
    #[must_use]
    pub fn lap_times(&self) -> &[LapTime] {
        &self.lap_times
    }

    /// Materializes the history for fitting.
    ///
    /// Row `i` of the matrix and entry `i` of the vector belong to the `i`-th
    /// recorded lap. Laps that did not finish enter as
    /// [`DNF_LAP_TIME`](crate::DNF_LAP_TIME).
    #[must_use]
    pub fn as_matrix(&self) -> (DMatrix<f64>, DVector<f64>) {
        let dim = self.space.dim();
        let inputs = DMatrix::from_fn(self.len(), dim, |row, col| self.vectors[row].values()[col]);
        let targets = DVector::from_iterator(self.len(), self.lap_times.iter().map(|t| t.seconds()));
        (inputs, targets)
    }

    /// Returns the observation with the fastest lap.
    ///
    /// Ties go to the earliest recorded lap. Returns `None` when the store is
    /// empty.
    #[must_use]
    pub fn best(&self) -> Option<Observation> {
        let mut best: Option<usize> = None;
        for (index, lap_time) in self.lap_times.iter().enumerate() {
            if best.is_none_or(|current| *lap_time < self.lap_times[current]) {
                best = Some(index);
            }
        }
        best.and_then(|index| self.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::lap_time::DNF_LAP_TIME;

    fn space() -> Arc<ParameterSpace> {
        Arc::new(ParameterSpace::follow_the_gap_v7())
    }

    fn vector(space: &Arc<ParameterSpace>, radius: f64) -> ParameterVector {
        space
            .vector(&[radius, 2.0, 3.0, 2.0, 4.0, 0.5, 5.0])
            .unwrap()
    }

    #[test]
    fn empty_store_has_no_best() {
        let store = ObservationStore::new(space());

        assert!(store.is_empty());
        assert_eq!(store.size(), 0);
        assert!(store.best().is_none());
    }

    #[test]
    fn best_is_fastest_lap() {
        let space = space();
        let mut store = ObservationStore::new(Arc::clone(&space));
        for (radius, time) in [(20.0, 12.0), (30.0, 9.5), (40.0, 15.2)] {
            store
                .append(vector(&space, radius), LapTime::Finished(time))
                .unwrap();
        }

        let best = store.best().unwrap();

        assert_eq!(store.size(), 3);
        assert_eq!(best.index, 1);
        assert_eq!(best.vector, vector(&space, 30.0));
        assert_eq!(best.lap_time, LapTime::Finished(9.5));
    }

    #[test]
    fn ties_go_to_earliest_lap() {
        let space = space();
        let mut store = ObservationStore::new(Arc::clone(&space));
        store
            .append(vector(&space, 20.0), LapTime::Finished(11.0))
            .unwrap();
        store
            .append(vector(&space, 30.0), LapTime::Finished(10.0))
            .unwrap();
        store
            .append(vector(&space, 40.0), LapTime::Finished(10.0))
            .unwrap();

        assert_eq!(store.best().unwrap().index, 1);
    }

    #[test]
    fn dnf_never_beats_a_finished_lap() {
        let space = space();
        let mut store = ObservationStore::new(Arc::clone(&space));
        store
            .append(vector(&space, 20.0), LapTime::DidNotFinish)
            .unwrap();
        store
            .append(vector(&space, 30.0), LapTime::Finished(80.0))
            .unwrap();

        assert_eq!(store.best().unwrap().index, 1);
    }

    #[test]
    fn matrix_follows_insertion_order() {
        let space = space();
        let mut store = ObservationStore::new(Arc::clone(&space));
        store
            .append(vector(&space, 20.0), LapTime::Finished(12.0))
            .unwrap();
        store
            .append(vector(&space, 60.0), LapTime::DidNotFinish)
            .unwrap();

        let (inputs, targets) = store.as_matrix();

        assert_eq!(inputs.shape(), (2, 7));
        assert_relative_eq!(inputs[(0, 0)], 20.0);
        assert_relative_eq!(inputs[(1, 0)], 60.0);
        assert_relative_eq!(targets[0], 12.0);
        assert_relative_eq!(targets[1], DNF_LAP_TIME);
    }

    #[test]
    fn rejects_vectors_from_another_space() {
        let mut store = ObservationStore::new(space());
        let v6 = Arc::new(ParameterSpace::follow_the_gap_v6());
        let foreign = v6.vector(&[20.0, 2.0, 2.0, 0.5, 0.5, 3.0]).unwrap();

        let result = store.append(foreign, LapTime::Finished(10.0));

        assert_eq!(
            result,
            Err(ShapeError {
                expected: 7,
                found: 6
            })
        );
        assert!(store.is_empty());
    }
}
