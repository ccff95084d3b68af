use gaptune_core::Prediction;
use nalgebra::DVector;
use thiserror::Error;

/// How the engine trades predicted speed against uncertainty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Favor candidates that are fast or poorly explored.
    #[default]
    Explore,

    /// Ignore uncertainty and return the fastest predicted candidate.
    BestOnly,
}

/// Errors that can occur when constructing an acquisition policy.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum AcquisitionError {
    #[error("exploration weight must be finite and non-negative, got {0}")]
    Weight(f64),
}

/// Lower-confidence-bound scoring: `score = mean - w * std_dev`.
///
/// Lower scores are better because lap time is minimized. Subtracting the
/// weighted deviation pulls selection toward regions the model knows little
/// about even when their predicted mean is mediocre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquisitionPolicy {
    exploration_weight: f64,
}

impl Default for AcquisitionPolicy {
    fn default() -> Self {
        Self {
            exploration_weight: 1.0,
        }
    }
}

impl AcquisitionPolicy {
    /// Creates a policy with the given exploration weight.
    ///
    /// # Errors
    ///
    /// Returns an error if `exploration_weight` is negative or non-finite.
    pub fn new(exploration_weight: f64) -> Result<Self, AcquisitionError> {
        if !exploration_weight.is_finite() || exploration_weight < 0.0 {
            return Err(AcquisitionError::Weight(exploration_weight));
        }
        Ok(Self { exploration_weight })
    }

    /// Returns the exploration weight used in [`Mode::Explore`].
    #[must_use]
    pub fn exploration_weight(&self) -> f64 {
        self.exploration_weight
    }

    /// Returns the weight applied to the deviation in `mode`.
    #[must_use]
    pub fn weight(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Explore => self.exploration_weight,
            Mode::BestOnly => 0.0,
        }
    }

    /// Scores every candidate.
    #[must_use]
    pub fn scores(&self, prediction: &Prediction, mode: Mode) -> DVector<f64> {
        let w = self.weight(mode);
        if w == 0.0 {
            // Avoid 0 * inf turning an infinite deviation into NaN.
            return prediction.mean.clone();
        }
        prediction.mean.zip_map(&prediction.std_dev, |mean, std| mean - w * std)
    }

    /// Returns the index of the best-scoring candidate.
    ///
    /// Ties go to the lowest index. NaN scores never win. Returns `None` for
    /// an empty batch or when every score is NaN.
    #[must_use]
    pub fn select(&self, prediction: &Prediction, mode: Mode) -> Option<usize> {
        let scores = self.scores(prediction, mode);
        let mut best: Option<(usize, f64)> = None;
        for (index, &score) in scores.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, current)| score < current) {
                best = Some((index, score));
            }
        }
        best.map(|(index, _)| index)
    }
}
