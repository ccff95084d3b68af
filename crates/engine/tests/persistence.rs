use std::{fs, sync::Arc};

use gaptune_core::{LapTime, ParameterSpace, Surrogate};
use gaptune_engine::{Config, Engine, JsonFileStorage, Mode, PersistenceError, Phase, Storage};
use tempfile::TempDir;

fn space() -> Arc<ParameterSpace> {
    Arc::new(ParameterSpace::follow_the_gap_v7())
}

/// Fills an engine with cold-start draws; the warmup is never reached.
fn engine_with(laps: usize) -> Engine {
    let config = Config::new(1000, 1.0, 1000).unwrap().with_seed(laps as u64);
    let mut engine = Engine::new(space(), config);
    for i in 0..laps {
        let vector = engine.request(Mode::Explore);
        let lap = if i % 7 == 6 {
            LapTime::DidNotFinish
        } else {
            LapTime::Finished(9.0 + (i % 5) as f64 * 0.37)
        };
        engine.record(vector, lap).unwrap();
    }
    engine
}

#[test]
fn round_trip_preserves_history() {
    let dir = TempDir::new().unwrap();

    for size in [0, 1, 50] {
        let storage = JsonFileStorage::new(dir.path().join(format!("history-{size}.json")));
        let original = engine_with(size);
        original.save(&storage).unwrap();

        let mut restored = Engine::new(space(), Config::default());
        let loaded = restored.load(&storage).unwrap();

        assert_eq!(loaded, size);
        assert_eq!(restored.history().as_matrix(), original.history().as_matrix());
        assert_eq!(restored.history().lap_times(), original.history().lap_times());
    }
}

#[test]
fn reload_past_warmup_is_ready_to_guide() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("history.json"));
    engine_with(8).save(&storage).unwrap();

    let mut restored = Engine::new(space(), Config::default().with_seed(3));
    restored.load(&storage).unwrap();

    assert_eq!(restored.phase(), Phase::Trained);
    assert!(restored.surrogate().is_fitted());
    assert!(restored.request(Mode::BestOnly).in_bounds());
}

#[test]
fn corrupt_file_yields_empty_engine_and_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    fs::write(&path, "\u{0}\u{1}not a history").unwrap();
    let storage = JsonFileStorage::new(&path);

    let mut engine = Engine::new(space(), Config::default().with_seed(1));
    let err = engine.load(&storage).unwrap_err();

    assert!(matches!(err, PersistenceError::Corrupt { .. }));
    assert!(err.is_recoverable());
    assert_eq!(engine.size(), 0);

    let vector = engine.request(Mode::Explore);
    engine.record(vector, LapTime::Finished(10.2)).unwrap();
    engine.save(&storage).unwrap();

    let reloaded = storage.load(&space()).unwrap();
    assert_eq!(reloaded.size(), 1);
}

#[test]
fn missing_file_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("never-saved.json"));
    let mut engine = Engine::new(space(), Config::default());

    let err = engine.load(&storage).unwrap_err();

    assert!(matches!(err, PersistenceError::NotFound { .. }));
    assert_eq!(engine.phase(), Phase::ColdStart);
}

#[test]
fn history_from_another_revision_is_rejected() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("history.json"));
    let v6 = Arc::new(ParameterSpace::follow_the_gap_v6());
    let mut old = Engine::new(Arc::clone(&v6), Config::default());
    old.record_values(&[40.0, 3.0, 2.5, 0.6, 0.4, 4.0], LapTime::Finished(11.0))
        .unwrap();
    old.save(&storage).unwrap();

    let mut engine = Engine::new(space(), Config::default());
    let err = engine.load(&storage).unwrap_err();

    assert!(matches!(
        err,
        PersistenceError::DimensionMismatch {
            expected: 7,
            found: 6
        }
    ));
    assert!(!err.is_recoverable());
    assert_eq!(engine.size(), 0);
}

#[test]
fn saved_file_holds_only_params_and_laptimes() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("history.json"));
    engine_with(2).save(&storage).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(storage.path()).unwrap()).unwrap();
    let object = json.as_object().unwrap();

    let mut keys: Vec<_> = object.keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["laptimes", "params"]);
    assert_eq!(object["params"].as_array().unwrap().len(), 2);
}

#[test]
fn unreadable_history_yields_empty_engine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    fs::create_dir(&path).unwrap();
    let storage = JsonFileStorage::new(&path);
    let mut engine = engine_with(3);

    let err = engine.load(&storage).unwrap_err();

    assert!(matches!(err, PersistenceError::Unreadable { .. }));
    assert!(err.is_recoverable());
    assert_eq!(engine.size(), 0);
    assert!(engine.request(Mode::Explore).in_bounds());
}
