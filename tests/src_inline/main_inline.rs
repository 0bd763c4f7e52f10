use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_heartrisk_main_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn predict_args(extra: &[&str]) -> PredictArgs {
    let mut argv = vec!["kira-heartrisk", "predict"];
    argv.extend_from_slice(extra);
    match Cli::try_parse_from(argv).unwrap().command {
        Command::Predict(args) => args,
        other => panic!("expected predict, got {other:?}"),
    }
}

fn write_models(dir: &Path) {
    fs::write(
        dir.join("logistic_regression_model.json"),
        r#"{"kind":"logistic_regression","coefficients":[0,0,0,0,0,0,0,0,0,0,0,0,0],"intercept":0.0}"#,
    )
    .unwrap();
    fs::write(
        dir.join("random_forest_model.json"),
        r#"{"kind":"random_forest","n_features":13,"n_classes":2,"trees":[
            {"nodes":[
                {"feature":9,"threshold":1.5,"left":1,"right":2},
                {"value":[9.0,1.0]},
                {"value":[1.0,9.0]}
            ]}
        ]}"#,
    )
    .unwrap();
}

#[test]
fn test_parse_predict_defaults() {
    let args = predict_args(&[]);
    assert_eq!(args.format, FormatArg::Text);
    assert_eq!(args.weight_lr, 1.0);
    assert_eq!(args.weight_rf, 1.0);
    assert!(args.session.is_none());
    assert!(args.fields.age.is_none());
}

#[test]
fn test_parse_predict_fields() {
    let args = predict_args(&[
        "--age",
        "63",
        "--sex",
        "female",
        "--cholesterol",
        "-20",
        "--st-depression",
        "2.3",
        "--thalassemia",
        "1",
        "--format",
        "json",
    ]);
    assert_eq!(args.fields.age, Some(63));
    assert_eq!(args.fields.sex, Some(SexArg::Female));
    assert_eq!(args.fields.cholesterol, Some(-20));
    assert_eq!(args.fields.st_depression, Some(2.3));
    assert_eq!(args.fields.thalassemia, Some(1));
    assert_eq!(args.format, FormatArg::Json);
}

#[test]
fn test_parse_rejects_out_of_widget_bounds() {
    for bad in [
        ["--age", "0"],
        ["--age", "121"],
        ["--major-vessels", "4"],
        ["--chest-pain-type", "4"],
        ["--slope", "3"],
    ] {
        let mut argv = vec!["kira-heartrisk", "predict"];
        argv.extend_from_slice(&bad);
        assert!(Cli::try_parse_from(argv).is_err(), "{:?} accepted", bad);
    }
}

#[test]
fn test_save_session_requires_session() {
    assert!(Cli::try_parse_from(["kira-heartrisk", "predict", "--save-session"]).is_err());
}

#[test]
fn test_apply_overrides_keeps_untouched_fields() {
    let mut form = SessionState::reset();
    let fields = FieldArgs {
        age: Some(63),
        sex: Some(SexArg::Female),
        major_vessels: Some(2),
        ..FieldArgs::default()
    };
    apply_overrides(&mut form, &fields);
    assert_eq!(form.age, 63);
    assert_eq!(form.sex, Sex::Female);
    assert_eq!(form.major_vessels, 2);
    assert_eq!(form.cholesterol, 200);
    assert_eq!(form.st_depression, 1.0);
}

#[test]
fn test_resolve_models_dir() {
    let exe = Path::new("/opt/kira/bin/kira-heartrisk");
    assert_eq!(
        resolve_models_dir(None, Some(exe)),
        PathBuf::from("/opt/kira/bin/../models")
    );
    assert_eq!(
        resolve_models_dir(Some(Path::new("/data/models")), Some(exe)),
        PathBuf::from("/data/models")
    );
    assert_eq!(resolve_models_dir(None, None), PathBuf::from("models"));
}

#[test]
fn test_reset_writes_session() {
    let dir = make_temp_dir();
    let path = dir.join("session.json");
    run_reset(&path).unwrap();
    assert_eq!(SessionState::load(&path).unwrap(), SessionState::reset());
}

#[test]
fn test_predict_end_to_end() {
    let dir = make_temp_dir();
    write_models(&dir);
    let out = dir.join("report.json");
    let session = dir.join("session.json");

    let mut args = predict_args(&[
        "--age",
        "63",
        "--resting-bp",
        "145",
        "--cholesterol",
        "233",
        "--fasting-bs",
        "1",
        "--st-depression",
        "2.3",
        "--thalassemia",
        "1",
        "--format",
        "json",
    ]);
    args.session = Some(session.clone());
    args.save_session = true;
    args.out = Some(out.clone());

    let store = load_models(&dir);
    assert!(store.is_complete());
    run_predict(build_config(args), &store).unwrap();

    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let combined = v["probabilities"]["combined"].as_f64().unwrap();
    assert!((combined - 0.7).abs() < 1e-12);
    let expected = crate::pipeline::stage3_classify::classify(combined);
    assert_eq!(v["label"], expected.label());
    assert_eq!(v["color"], expected.color());
    assert_eq!(v["advisory"], expected.advisory());

    let saved = SessionState::load(&session).unwrap();
    assert_eq!(saved.age, 63);
    assert_eq!(saved.thalassemia, 1);
}

#[test]
fn test_predict_with_missing_model_fails_cleanly() {
    let dir = make_temp_dir();
    let mut args = predict_args(&[]);
    args.out = Some(dir.join("never.txt"));
    let store = load_models(&dir);
    let err = run_predict(build_config(args), &store).unwrap_err();
    assert!(err.starts_with("Prediction failed:"));
    assert!(err.contains("Logistic Regression model is not loaded"));
    assert!(!dir.join("never.txt").exists());
}

#[test]
fn test_models_dir_is_global() {
    let cli = Cli::try_parse_from([
        "kira-heartrisk",
        "reset",
        "--session",
        "s.json",
        "--models-dir",
        "/data/models",
    ])
    .unwrap();
    assert_eq!(cli.models_dir, Some(PathBuf::from("/data/models")));

    let cli = Cli::try_parse_from(["kira-heartrisk", "--models-dir", "m", "predict"]).unwrap();
    assert_eq!(cli.models_dir, Some(PathBuf::from("m")));
}

#[test]
fn test_model_load_errors_reported_before_form_validation() {
    let dir = make_temp_dir();
    let session = dir.join("session.json");
    fs::write(&session, r#"{"Age": 0}"#).unwrap();

    let store = load_models(&dir);
    let errors: Vec<String> = store.load_errors().iter().map(|e| e.to_string()).collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("Could not find Logistic Regression model at"));
    assert!(errors[1].starts_with("Could not find Random Forest model at"));

    let mut args = predict_args(&[]);
    args.session = Some(session);
    let err = run_predict(build_config(args), &store).unwrap_err();
    assert!(err.starts_with("invalid input:"));
}
