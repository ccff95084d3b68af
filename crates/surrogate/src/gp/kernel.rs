use nalgebra::DMatrix;

/// A squared-exponential kernel scaled by a constant:
///
/// `k(a, b) = c * exp(-|a - b|² / (2 l²))`
///
/// `c` sets the overall variance of the modeled function and `l` sets how
/// far apart two vectors must be before their lap times decorrelate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    /// Signal variance `c`.
    pub constant: f64,

    /// Length-scale `l`.
    pub length_scale: f64,
}

impl Default for Kernel {
    fn default() -> Self {
        Self {
            constant: 1.0,
            length_scale: 1.0,
        }
    }
}

impl Kernel {
    /// Search bounds for the constant.
    pub const CONSTANT_BOUNDS: [f64; 2] = [1e-4, 1e4];

    /// Search bounds for the length-scale.
    pub const LENGTH_SCALE_BOUNDS: [f64; 2] = [1e-3, 1e3];

    /// Builds a kernel from natural-log hyperparameters `[ln c, ln l]`.
    #[must_use]
    pub fn from_log(theta: [f64; 2]) -> Self {
        Self {
            constant: theta[0].exp(),
            length_scale: theta[1].exp(),
        }
    }

    /// Returns the natural-log hyperparameters `[ln c, ln l]`.
    #[must_use]
    pub fn to_log(self) -> [f64; 2] {
        [self.constant.ln(), self.length_scale.ln()]
    }

    /// Returns the log-space search bounds, one pair per hyperparameter.
    #[must_use]
    pub fn log_bounds() -> [[f64; 2]; 2] {
        let [c_lo, c_hi] = Self::CONSTANT_BOUNDS;
        let [l_lo, l_hi] = Self::LENGTH_SCALE_BOUNDS;
        [[c_lo.ln(), c_hi.ln()], [l_lo.ln(), l_hi.ln()]]
    }

    /// Evaluates the kernel at a squared distance.
    #[must_use]
    pub fn at(&self, squared_distance: f64) -> f64 {
        self.constant * (-0.5 * squared_distance / (self.length_scale * self.length_scale)).exp()
    }

    /// Returns the `n × n` covariance of the rows of `x` with themselves.
    #[must_use]
    pub fn matrix(&self, x: &DMatrix<f64>) -> DMatrix<f64> {
        let n = x.nrows();
        let mut k = DMatrix::zeros(n, n);
        for i in 0..n {
            k[(i, i)] = self.constant;
            for j in 0..i {
                let value = self.at(squared_distance(x, i, x, j));
                k[(i, j)] = value;
                k[(j, i)] = value;
            }
        }
        k
    }

    /// Returns the `a.nrows() × b.nrows()` cross-covariance.
    #[must_use]
    pub fn cross(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> DMatrix<f64> {
        DMatrix::from_fn(a.nrows(), b.nrows(), |i, j| {
            self.at(squared_distance(a, i, b, j))
        })
    }
}

/// Squared Euclidean distance between row `i` of `a` and row `j` of `b`.
fn squared_distance(a: &DMatrix<f64>, i: usize, b: &DMatrix<f64>, j: usize) -> f64 {
    (0..a.ncols())
        .map(|col| {
            let d = a[(i, col)] - b[(j, col)];
            d * d
        })
        .sum()
}
