use approx::assert_relative_eq;

use super::{Config, Status, maximize, minimize};

#[test]
fn minimizes_a_parabola() {
    let solution = minimize(|x| (x - 2.0).powi(2), [0.0, 5.0], &Config::default());

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x, 2.0, epsilon = 1e-5);
    assert_relative_eq!(solution.objective, 0.0, epsilon = 1e-9);
}

#[test]
fn maximizes_a_parabola_with_reversed_bracket() {
    let solution = maximize(|x| 3.0 - (x + 1.0).powi(2), [3.0, -3.0], &Config::default());

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x, -1.0, epsilon = 1e-5);
    assert_relative_eq!(solution.objective, 3.0, epsilon = 1e-9);
}

#[test]
fn optimum_at_the_boundary_is_approached() {
    let solution = minimize(|x| x, [1.0, 4.0], &Config::default());

    assert_relative_eq!(solution.x, 1.0, epsilon = 1e-5);
}

#[test]
fn non_finite_values_are_avoided() {
    // Undefined left of 1.0, minimum of the defined part at 1.5.
    let f = |x: f64| if x < 1.0 { f64::NAN } else { (x - 1.5).powi(2) };

    let solution = minimize(f, [0.0, 3.0], &Config::default());

    assert!(solution.objective.is_finite());
    assert_relative_eq!(solution.x, 1.5, epsilon = 1e-4);
}

#[test]
fn stops_at_iteration_limit() {
    let config = Config::new(2, 1e-12).unwrap();
    let mut evaluations = 0;

    let solution = minimize(
        |x| {
            evaluations += 1;
            x * x
        },
        [-10.0, 10.0],
        &config,
    );

    assert_eq!(solution.status, Status::MaxIters);
    assert_eq!(solution.iters, 2);
    // Two initial probes plus one per iteration.
    assert_eq!(evaluations, 4);
}

#[test]
fn collapsed_bracket_converges_immediately() {
    let solution = minimize(|x| x * x, [1.5, 1.5], &Config::default());

    assert_eq!(solution.status, Status::Converged);
    assert_eq!(solution.iters, 0);
    assert_relative_eq!(solution.x, 1.5);
}

#[test]
fn rejects_invalid_tolerances() {
    assert!(Config::new(10, -1.0).is_err());
    assert!(Config::new(10, f64::NAN).is_err());
    assert!(Config::new(0, 0.0).is_ok());
}
