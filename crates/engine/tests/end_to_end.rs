use std::sync::Arc;

use gaptune_core::{Field, LapTime, ParameterSpace};
use gaptune_engine::{Config, Engine, Mode, Phase};

fn bounded_space() -> Arc<ParameterSpace> {
    Arc::new(
        ParameterSpace::new(vec![
            Field::integer("bubble_radius", 20.0, 100.0),
            Field::real("max_lidar_dist", 1.0, 8.0),
            Field::real("straight_speed", 1.0, 8.0),
            Field::real("corner_speed", 1.0, 5.0),
            Field::real("speed_max", 1.0, 7.0),
            Field::real("steer_smooth_alpha", 0.0, 0.9),
            Field::integer("preprocess_conv_size", 1.0, 10.0),
        ])
        .unwrap(),
    )
}

#[test]
fn cold_start_requests_then_best_of_three() {
    let space = bounded_space();
    let config = Config::new(3, 1.0, 1000).unwrap();
    let mut engine = Engine::new(Arc::clone(&space), config);

    let proposals: Vec<_> = (0..3).map(|_| engine.request(Mode::Explore)).collect();
    for proposal in &proposals {
        assert!(proposal.in_bounds(), "{proposal} is out of bounds");
    }
    assert_eq!(engine.size(), 0);

    for (proposal, lap) in proposals.iter().zip([12.0, 9.5, 15.2]) {
        engine
            .record(proposal.clone(), LapTime::finished(lap).unwrap())
            .unwrap();
    }

    let best = engine.best().unwrap();
    assert_eq!(engine.size(), 3);
    assert_eq!(best.index, 1);
    assert_eq!(best.vector, proposals[1]);
    assert_eq!(best.lap_time, LapTime::Finished(9.5));
    assert_eq!(engine.phase(), Phase::Trained);
}

/// A synthetic track where lap time depends smoothly on two parameters.
fn simulated_lap(values: &[f64]) -> f64 {
    let radius = (values[0] - 60.0) / 40.0;
    let speed = (values[2] - 5.0) / 3.0;
    10.0 + 3.0 * radius * radius + 2.0 * speed * speed
}

#[test]
fn guided_requests_find_a_fast_lap() {
    let space = bounded_space();
    let config = Config::new(5, 1.0, 500)
        .unwrap()
        .with_seed(2024)
        .with_surrogate(3, 0.01)
        .unwrap();
    let mut engine = Engine::new(space, config);

    for _ in 0..5 {
        let vector = engine.request(Mode::Explore);
        let lap = simulated_lap(vector.values());
        engine.record(vector, LapTime::Finished(lap)).unwrap();
    }
    let cold_best = engine.best().unwrap().lap_time.seconds();

    for _ in 0..15 {
        let vector = engine.request(Mode::Explore);
        let lap = simulated_lap(vector.values());
        engine.record(vector, LapTime::Finished(lap)).unwrap();
    }
    let guided_best = engine.best().unwrap().lap_time.seconds();

    assert_eq!(engine.size(), 20);
    assert!(guided_best <= cold_best);
    assert!(guided_best < 11.0, "best lap {guided_best} stayed far from optimum");
}

#[test]
fn dnf_laps_steer_away_from_crashes() {
    let space = bounded_space();
    let config = Config::new(3, 0.0, 300).unwrap().with_seed(5);
    let mut engine = Engine::new(Arc::clone(&space), config);

    engine
        .record_values(&[100.0, 8.0, 8.0, 5.0, 7.0, 0.9, 10.0], LapTime::DidNotFinish)
        .unwrap();
    engine
        .record_values(&[20.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0], LapTime::Finished(11.0))
        .unwrap();
    engine
        .record_values(&[60.0, 4.5, 4.5, 3.0, 4.0, 0.45, 5.0], LapTime::Finished(10.0))
        .unwrap();

    let next = engine.request(Mode::BestOnly);

    let crash = [100.0, 8.0, 8.0, 5.0, 7.0, 0.9, 10.0];
    let good = [60.0, 4.5, 4.5, 3.0, 4.0, 0.45, 5.0];
    let slow = [20.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0];
    let to_crash = unit_distance(&space, next.values(), &crash);
    let to_finished = unit_distance(&space, next.values(), &good)
        .min(unit_distance(&space, next.values(), &slow));
    assert!(to_finished < to_crash);
    assert_eq!(engine.best().unwrap().index, 2);
}

fn unit_distance(space: &ParameterSpace, a: &[f64], b: &[f64]) -> f64 {
    space
        .fields()
        .iter()
        .zip(a.iter().zip(b))
        .map(|(field, (x, y))| (field.normalize(*x) - field.normalize(*y)).powi(2))
        .sum::<f64>()
        .sqrt()
}
