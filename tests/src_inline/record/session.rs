use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_heartrisk_session_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_reset_restores_documented_literals() {
    let s = SessionState::reset();
    assert_eq!(s.age, 100);
    assert_eq!(s.sex, Sex::Male);
    assert_eq!(s.chest_pain_type, 0);
    assert_eq!(s.resting_bp, 120);
    assert_eq!(s.cholesterol, 200);
    assert_eq!(s.fasting_bs, 0);
    assert_eq!(s.resting_ecg, 0);
    assert_eq!(s.max_heart_rate, 150);
    assert_eq!(s.exercise_angina, 0);
    assert_eq!(s.st_depression, 1.0);
    assert_eq!(s.slope, 0);
    assert_eq!(s.major_vessels, 0);
    assert_eq!(s.thalassemia, 0);
}

#[test]
fn test_initial_form_differs_from_reset_only_in_age() {
    let initial = SessionState::default();
    assert_eq!(initial.age, 50);
    let mut reset = SessionState::reset();
    reset.age = 50;
    assert_eq!(initial, reset);
}

#[test]
fn test_to_record_maps_codes() {
    let s = SessionState {
        age: 63,
        sex: Sex::Female,
        chest_pain_type: 3,
        fasting_bs: 1,
        resting_ecg: 2,
        exercise_angina: 1,
        slope: 1,
        major_vessels: 2,
        thalassemia: 2,
        ..SessionState::default()
    };
    let r = s.to_record().unwrap();
    assert_eq!(r.age, 63);
    assert_eq!(r.sex, Sex::Female);
    assert_eq!(r.chest_pain_type, ChestPainType::Asymptomatic);
    assert!(r.fasting_bs);
    assert_eq!(r.resting_ecg, RestingEcg::LvHypertrophy);
    assert!(r.exercise_angina);
    assert_eq!(r.slope, StSlope::Flat);
    assert_eq!(r.major_vessels, 2);
    assert_eq!(r.thalassemia, Thalassemia::ReversibleDefect);
}

#[test]
fn test_widget_bounds_enforced() {
    let too_old = SessionState {
        age: 121,
        ..SessionState::default()
    };
    assert_eq!(
        too_old.to_record(),
        Err(RecordError::OutOfBounds {
            field: "Age",
            min: 1,
            max: 120,
            value: 121
        })
    );
    let zero_age = SessionState {
        age: 0,
        ..SessionState::default()
    };
    assert!(zero_age.to_record().is_err());
    let vessels = SessionState {
        major_vessels: 4,
        ..SessionState::default()
    };
    assert!(vessels.to_record().is_err());
    let nan = SessionState {
        st_depression: f64::NAN,
        ..SessionState::default()
    };
    assert_eq!(
        nan.to_record(),
        Err(RecordError::NonFinite {
            field: "ST_Depression"
        })
    );
}

#[test]
fn test_unconstrained_fields_not_validated() {
    let s = SessionState {
        cholesterol: -40,
        resting_bp: 900,
        max_heart_rate: -1,
        st_depression: -12.5,
        ..SessionState::default()
    };
    let r = s.to_record().unwrap();
    assert_eq!(r.cholesterol, -40);
    assert_eq!(r.resting_bp, 900);
    assert_eq!(r.st_depression, -12.5);
}

#[test]
fn test_save_load_uses_form_keys() {
    let dir = make_temp_dir();
    let path = dir.join("nested").join("session.json");
    let s = SessionState {
        age: 71,
        sex: Sex::Female,
        st_depression: 2.3,
        ..SessionState::default()
    };
    s.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"Age\": 71"));
    assert!(text.contains("\"Sex\": \"Female\""));
    assert!(text.contains("\"Chest_Pain_Type\""));

    let loaded = SessionState::load(&path).unwrap();
    assert_eq!(loaded, s);
}

#[test]
fn test_partial_session_falls_back_to_defaults() {
    let dir = make_temp_dir();
    let path = dir.join("partial.json");
    fs::write(&path, "{\"Age\": 44, \"Cholesterol\": 250}").unwrap();
    let loaded = SessionState::load(&path).unwrap();
    assert_eq!(loaded.age, 44);
    assert_eq!(loaded.cholesterol, 250);
    assert_eq!(loaded.resting_bp, 120);
}

#[test]
fn test_load_errors() {
    let dir = make_temp_dir();
    let missing = dir.join("missing.json");
    assert!(matches!(
        SessionState::load(&missing),
        Err(SessionError::Io { .. })
    ));
    let bad = dir.join("bad.json");
    fs::write(&bad, "not json").unwrap();
    assert!(matches!(
        SessionState::load(&bad),
        Err(SessionError::Json { .. })
    ));
}
