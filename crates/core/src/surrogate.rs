use nalgebra::{DMatrix, DVector};

/// A probabilistic regression model of lap time over the parameter space.
///
/// The engine fits a surrogate against the full history, then asks it for a
/// predicted mean and standard deviation at each candidate. Implementations
/// own their fitted state; [`Surrogate::predict`] must not be called before a
/// successful [`Surrogate::fit`].
///
/// Inputs are row-major: each row of `inputs` and `candidates` is one vector.
pub trait Surrogate {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fits the model to observed lap times.
    ///
    /// A failed fit leaves the model unfitted.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the data is degenerate or the fit is
    /// numerically unstable.
    fn fit(&mut self, inputs: &DMatrix<f64>, targets: &DVector<f64>) -> Result<(), Self::Error>;

    /// Predicts mean and standard deviation at each candidate row.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the model is unfitted or the candidates do
    /// not match the fitted dimensionality.
    fn predict(&self, candidates: &DMatrix<f64>) -> Result<Prediction, Self::Error>;

    /// Returns `true` once a fit has succeeded.
    fn is_fitted(&self) -> bool;
}

/// Per-candidate predicted lap time and its uncertainty.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted mean lap time.
    pub mean: DVector<f64>,

    /// Predicted standard deviation of the lap time.
    pub std_dev: DVector<f64>,
}

impl Prediction {
    /// Creates a prediction from matching mean and deviation vectors.
    ///
    /// # Panics
    ///
    /// Panics if the vectors have different lengths.
    #[must_use]
    pub fn new(mean: DVector<f64>, std_dev: DVector<f64>) -> Self {
        assert_eq!(
            mean.len(),
            std_dev.len(),
            "mean and std_dev must have one entry per candidate"
        );
        Self { mean, std_dev }
    }

    /// A zero-information prediction: every candidate looks the same.
    #[must_use]
    pub fn uninformed(len: usize, mean: f64, std_dev: f64) -> Self {
        Self {
            mean: DVector::from_element(len, mean),
            std_dev: DVector::from_element(len, std_dev),
        }
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    /// Returns `true` if there are no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}
