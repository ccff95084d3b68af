use super::{
    Config, Solution, Status,
    bracket::{Bracket, Keep},
};

/// Core golden section loop.
///
/// `transform` maps objective values to scores that are minimized, so the
/// same loop serves minimization (identity) and maximization (negation).
pub(super) fn search<F, T>(mut f: F, bracket: [f64; 2], config: &Config, transform: T) -> Solution
where
    F: FnMut(f64) -> f64,
    T: Fn(f64) -> f64,
{
    let mut score = |x: f64| {
        let objective = f(x);
        let s = transform(objective);
        (objective, if s.is_nan() { f64::INFINITY } else { s })
    };

    let mut bracket = Bracket::new(bracket);
    let mut lower = score(bracket.lower);
    let mut upper = score(bracket.upper);

    let mut best = if lower.1 <= upper.1 {
        (bracket.lower, lower)
    } else {
        (bracket.upper, upper)
    };

    let finish = |best: (f64, (f64, f64)), status, iters| Solution {
        status,
        x: best.0,
        objective: best.1.0,
        iters,
    };

    for iter in 0..config.max_iters() {
        if config.is_converged(bracket.width()) {
            return finish(best, Status::Converged, iter);
        }

        let keep = if lower.1 <= upper.1 {
            Keep::Lower
        } else {
            Keep::Upper
        };
        let x = bracket.shrink(keep);
        let point = score(x);

        match keep {
            Keep::Lower => {
                upper = lower;
                lower = point;
            }
            Keep::Upper => {
                lower = upper;
                upper = point;
            }
        }

        if point.1 < best.1.1 {
            best = (x, point);
        }
    }

    let status = if config.is_converged(bracket.width()) {
        Status::Converged
    } else {
        Status::MaxIters
    };
    finish(best, status, config.max_iters())
}
