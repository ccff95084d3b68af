use std::f64::consts::PI;

use nalgebra::{Cholesky, DMatrix, DVector};

use super::Kernel;

/// A factorized covariance and the quantities prediction needs.
#[derive(Debug, Clone)]
pub(super) struct Factorization {
    /// Lower Cholesky factor of `K + noise * I`.
    pub(super) l: DMatrix<f64>,

    /// `(K + noise * I)⁻¹ y`.
    pub(super) alpha: DVector<f64>,

    /// Log marginal likelihood of the targets.
    pub(super) log_likelihood: f64,
}

/// Factorizes the noisy covariance of `inputs` under `kernel`.
///
/// Returns `None` if the covariance is not positive definite or the
/// likelihood is not finite.
pub(super) fn factorize(
    kernel: &Kernel,
    inputs: &DMatrix<f64>,
    targets: &DVector<f64>,
    noise: f64,
) -> Option<Factorization> {
    let n = targets.len();
    let mut k = kernel.matrix(inputs);
    for i in 0..n {
        k[(i, i)] += noise;
    }

    let cholesky = Cholesky::new(k)?;
    let alpha = cholesky.solve(targets);
    let l = cholesky.l();

    #[allow(clippy::cast_precision_loss)]
    let log_likelihood = -0.5 * targets.dot(&alpha)
        - l.diagonal().iter().map(|d| d.ln()).sum::<f64>()
        - 0.5 * n as f64 * (2.0 * PI).ln();

    log_likelihood.is_finite().then_some(Factorization {
        l,
        alpha,
        log_likelihood,
    })
}

/// Returns the log marginal likelihood, or negative infinity when the
/// covariance cannot be factorized.
pub(super) fn log_likelihood(
    kernel: &Kernel,
    inputs: &DMatrix<f64>,
    targets: &DVector<f64>,
    noise: f64,
) -> f64 {
    factorize(kernel, inputs, targets, noise).map_or(f64::NEG_INFINITY, |f| f.log_likelihood)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn single_point_likelihood_matches_closed_form() {
        let kernel = Kernel {
            constant: 2.0,
            length_scale: 1.0,
        };
        let inputs = DMatrix::from_row_slice(1, 1, &[0.3]);
        let targets = DVector::from_vec(vec![1.5]);
        let noise = 0.5;

        let variance: f64 = 2.0 + 0.5;
        let expected =
            -0.5 * 1.5 * 1.5 / variance - 0.5 * variance.ln() - 0.5 * (2.0 * PI).ln();

        let factorization = factorize(&kernel, &inputs, &targets, noise).unwrap();

        assert_relative_eq!(factorization.log_likelihood, expected, epsilon = 1e-12);
        assert_relative_eq!(factorization.alpha[0], 1.5 / variance, epsilon = 1e-12);
    }

    #[test]
    fn duplicated_rows_stay_factorizable_with_noise() {
        let kernel = Kernel::default();
        let inputs = DMatrix::from_row_slice(2, 1, &[0.5, 0.5]);
        let targets = DVector::from_vec(vec![1.0, -1.0]);

        assert!(factorize(&kernel, &inputs, &targets, 0.01).is_some());
    }

    #[test]
    fn smooth_data_prefers_a_longer_length_scale() {
        let inputs = DMatrix::from_fn(8, 1, |i, _| i as f64 / 7.0);
        let targets = DVector::from_fn(8, |i, _| inputs[(i, 0)] - 0.5);

        let short = Kernel {
            constant: 1.0,
            length_scale: 0.01,
        };
        let long = Kernel {
            constant: 1.0,
            length_scale: 1.0,
        };

        assert!(
            log_likelihood(&long, &inputs, &targets, 0.01)
                > log_likelihood(&short, &inputs, &targets, 0.01)
        );
    }
}
