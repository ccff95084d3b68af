use nalgebra::{DMatrix, DVector};
use rand::{Rng, rngs::StdRng};
use tracing::debug;

use crate::golden_section;

use super::{Config, Kernel, likelihood::log_likelihood};

/// Half-width, in natural-log units, of each coordinate line search.
const LOG_SPAN: f64 = 3.0;

/// Hyperparameters chosen by [`optimize`] and their log likelihood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Optimum {
    pub(super) kernel: Kernel,
    pub(super) log_likelihood: f64,
}

/// Maximizes the log marginal likelihood over the kernel hyperparameters.
///
/// The first local search starts from [`Kernel::default`]; each restart
/// starts from a point drawn uniformly in log space within the bounds. The
/// best local optimum wins, with earlier searches kept on ties.
///
/// Returns `None` if no search found a factorizable covariance.
pub(super) fn optimize(
    inputs: &DMatrix<f64>,
    targets: &DVector<f64>,
    config: &Config,
    rng: &mut StdRng,
) -> Option<Optimum> {
    let bounds = Kernel::log_bounds();
    let mut best: Option<Optimum> = None;

    for restart in 0..=config.restarts() {
        let start = if restart == 0 {
            Kernel::default().to_log()
        } else {
            [
                rng.gen_range(bounds[0][0]..=bounds[0][1]),
                rng.gen_range(bounds[1][0]..=bounds[1][1]),
            ]
        };

        let Some(candidate) = local_search(start, inputs, targets, config) else {
            debug!(restart, "hyperparameter search found no usable covariance");
            continue;
        };

        debug!(
            restart,
            constant = candidate.kernel.constant,
            length_scale = candidate.kernel.length_scale,
            log_likelihood = candidate.log_likelihood,
            "hyperparameter search finished"
        );

        if best.is_none_or(|b| candidate.log_likelihood > b.log_likelihood) {
            best = Some(candidate);
        }
    }

    best
}

/// Cyclic coordinate ascent in log space from `start`.
///
/// Each coordinate is optimized by a golden section search over a bracket of
/// `±LOG_SPAN` around its current value, clipped to the bounds.
fn local_search(
    start: [f64; 2],
    inputs: &DMatrix<f64>,
    targets: &DVector<f64>,
    config: &Config,
) -> Option<Optimum> {
    let bounds = Kernel::log_bounds();
    let line = golden_section::Config::default();
    let noise = config.noise();
    let objective =
        |theta: [f64; 2]| log_likelihood(&Kernel::from_log(theta), inputs, targets, noise);

    let mut theta = start;
    let mut best = objective(theta);

    for _ in 0..config.max_sweeps() {
        let before = best;

        for coord in 0..theta.len() {
            let [lo, hi] = bounds[coord];
            let bracket = [
                (theta[coord] - LOG_SPAN).max(lo),
                (theta[coord] + LOG_SPAN).min(hi),
            ];

            let solution = golden_section::maximize(
                |value| {
                    let mut probe = theta;
                    probe[coord] = value;
                    objective(probe)
                },
                bracket,
                &line,
            );

            if solution.objective > best {
                theta[coord] = solution.x;
                best = solution.objective;
            }
        }

        if before.is_finite() && best - before <= config.sweep_tol() {
            break;
        }
    }

    best.is_finite().then(|| Optimum {
        kernel: Kernel::from_log(theta),
        log_likelihood: best,
    })
}
