//! Interval persistence tests.
//!
//! These tests verify the settings file through the public API:
//! - Values written by an interval change survive a fresh load
//! - Invalid input never reaches the file
//! - Missing and corrupt files fall back to the default

use std::fs;

use tokio::sync::mpsc;

use interval_timer::config::{ConfigError, IntervalStore};
use interval_timer::menubar::DialogOutcome;
use interval_timer::overlay::{MockOverlayFactory, OverlayWindows};
use interval_timer::timer::{ManualTickSource, TimerEngine};
use interval_timer::types::{TimerPhase, WorkInterval, DEFAULT_WORK_INTERVAL_SECS};

// ============================================================================
// Test Helpers
// ============================================================================

fn temp_store() -> (tempfile::TempDir, IntervalStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = IntervalStore::new(dir.path().join("nested").join("timer-config.json"));
    (dir, store)
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_minutes_survive_reload() {
    let (_dir, store) = temp_store();
    let mut factory = MockOverlayFactory::new();
    let mut overlays = OverlayWindows::build(&[], &mut factory);
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut engine = TimerEngine::new(WorkInterval::default(), ManualTickSource::new(), tx);

    for minutes in [1_i64, 2, 5, 25, 90, 1440] {
        let seconds = DialogOutcome::Submitted(minutes.to_string())
            .into_minutes()
            .unwrap()
            .unwrap()
            * 60;
        engine.change_interval(seconds, &store, &mut overlays).unwrap();

        let reloaded = IntervalStore::new(store.path());
        assert_eq!(i64::from(reloaded.load().as_secs()), minutes * 60);
    }
}

#[test]
fn test_file_format() {
    let (_dir, store) = temp_store();
    store.save(WorkInterval::from_minutes(7).unwrap()).unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["interval"], 420);
}

#[test]
fn test_reads_hand_written_file() {
    let (dir, _) = temp_store();
    let path = dir.path().join("timer-config.json");
    fs::write(&path, r#"{"interval": 900}"#).unwrap();

    assert_eq!(IntervalStore::new(&path).load().as_secs(), 900);
}

// ============================================================================
// Invalid Input
// ============================================================================

#[test]
fn test_invalid_input_leaves_file_and_phase_untouched() {
    let (_dir, store) = temp_store();
    store.save(WorkInterval::from_minutes(10).unwrap()).unwrap();

    let mut factory = MockOverlayFactory::new();
    let mut overlays = OverlayWindows::build(&[], &mut factory);
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut engine = TimerEngine::new(store.load(), ManualTickSource::new(), tx);
    engine.start(&mut overlays).unwrap();

    for text in ["", "abc", "0", "-10", "3.5"] {
        assert!(DialogOutcome::Submitted(text.to_string()).into_minutes().is_err());
    }
    for seconds in [0_i64, -60] {
        assert!(engine.change_interval(seconds, &store, &mut overlays).is_err());
    }

    assert_eq!(store.load().as_secs(), 600);
    assert_eq!(engine.state().phase, TimerPhase::Working);
    assert_eq!(engine.state().remaining_seconds, 600);
}

// ============================================================================
// Fallbacks
// ============================================================================

#[test]
fn test_missing_file_uses_default() {
    let (_dir, store) = temp_store();
    assert_eq!(store.load().as_secs(), DEFAULT_WORK_INTERVAL_SECS);
    assert!(store.try_load().unwrap().is_none());
}

#[test]
fn test_corrupt_file_uses_default() {
    let (dir, _) = temp_store();
    let path = dir.path().join("timer-config.json");
    fs::write(&path, "{ not json").unwrap();
    let store = IntervalStore::new(&path);

    assert_eq!(store.load().as_secs(), DEFAULT_WORK_INTERVAL_SECS);
    assert!(matches!(store.try_load(), Err(ConfigError::Parse(_))));
}

#[test]
fn test_non_positive_stored_value_uses_default() {
    let (dir, _) = temp_store();
    let path = dir.path().join("timer-config.json");
    fs::write(&path, r#"{"interval": -5}"#).unwrap();

    assert_eq!(
        IntervalStore::new(&path).load().as_secs(),
        DEFAULT_WORK_INTERVAL_SECS
    );
}

#[test]
fn test_save_creates_parent_directories() {
    let (_dir, store) = temp_store();
    store.save(WorkInterval::from_secs(45).unwrap()).unwrap();
    assert!(store.path().exists());
}
