mod logging;
mod model;
mod pipeline;
mod record;
mod report;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};

use crate::model::store::ModelStore;
use crate::model::thresholds::{ModelWeights, RiskThresholds};
use crate::pipeline::stage1_encode::encode;
use crate::pipeline::stage2_predict::predict_with_store;
use crate::pipeline::stage3_classify::classify;
use crate::pipeline::stage4_report::{ReportFormat, Stage4Input, build_report, write_report};
use crate::record::Sex;
use crate::record::session::SessionState;

#[derive(Debug, Parser)]
#[command(
    name = "kira-heartrisk",
    version,
    about = "Heart disease risk stratification from two pre-trained classifiers"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Directory holding the two model files (default: <exe dir>/../models).
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one patient and print the risk result with its gauge.
    Predict(PredictArgs),
    /// Restore the session file to the reset defaults.
    Reset(ResetArgs),
}

#[derive(Debug, Args)]
struct PredictArgs {
    /// Session file providing the starting form values.
    #[arg(long)]
    session: Option<PathBuf>,
    /// Write the merged form values back to --session.
    #[arg(long, requires = "session")]
    save_session: bool,
    #[command(flatten)]
    fields: FieldArgs,
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,
    /// Write the report here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, default_value_t = 1.0)]
    weight_lr: f64,
    #[arg(long, default_value_t = 1.0)]
    weight_rf: f64,
}

#[derive(Debug, Args)]
struct ResetArgs {
    #[arg(long)]
    session: PathBuf,
}

#[derive(Debug, Clone, Default, Args)]
struct FieldArgs {
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=120))]
    age: Option<i64>,
    #[arg(long, value_enum)]
    sex: Option<SexArg>,
    /// 0: Typical, 1: Atypical, 2: Non-anginal, 3: Asymptomatic
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
    chest_pain_type: Option<u8>,
    /// Resting blood pressure (mmHg)
    #[arg(long, allow_negative_numbers = true)]
    resting_bp: Option<i32>,
    /// Cholesterol (mg/dl)
    #[arg(long, allow_negative_numbers = true)]
    cholesterol: Option<i32>,
    /// Fasting blood sugar > 120 mg/dl (1 = Yes, 0 = No)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    fasting_bs: Option<u8>,
    /// 0: Normal, 1: ST-T Wave Abnormality, 2: LV Hypertrophy
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    resting_ecg: Option<u8>,
    #[arg(long, allow_negative_numbers = true)]
    max_heart_rate: Option<i32>,
    /// Exercise induced angina (1 = Yes, 0 = No)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    exercise_angina: Option<u8>,
    /// ST depression induced by exercise
    #[arg(long, allow_negative_numbers = true)]
    st_depression: Option<f64>,
    /// 0: Upsloping, 1: Flat, 2: Downsloping
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    slope: Option<u8>,
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=3))]
    major_vessels: Option<i64>,
    /// 0: Normal, 1: Fixed Defect, 2: Reversible Defect
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    thalassemia: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SexArg {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

#[derive(Debug, Clone)]
struct RunConfig {
    session_path: Option<PathBuf>,
    save_session: bool,
    fields: FieldArgs,
    format: ReportFormat,
    out: Option<PathBuf>,
    weights: ModelWeights,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);
    let exe = std::env::current_exe().ok();
    let models_dir = resolve_models_dir(cli.models_dir.as_deref(), exe.as_deref());
    let store = load_models(&models_dir);
    let result = match cli.command {
        Command::Predict(args) => run_predict(build_config(args), &store),
        Command::Reset(args) => run_reset(&args.session),
    };
    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn load_models(models_dir: &Path) -> ModelStore {
    let store = ModelStore::load_dir(models_dir);
    for err in store.load_errors() {
        eprintln!("{err}");
    }
    if !store.is_complete() {
        warn!("running with an incomplete model store");
    }
    store
}

fn build_config(args: PredictArgs) -> RunConfig {
    RunConfig {
        session_path: args.session,
        save_session: args.save_session,
        fields: args.fields,
        format: match args.format {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        },
        out: args.out,
        weights: ModelWeights {
            logistic: args.weight_lr,
            forest: args.weight_rf,
        },
    }
}

fn run_predict(config: RunConfig, store: &ModelStore) -> Result<(), String> {
    let mut form = match &config.session_path {
        Some(path) if path.exists() => SessionState::load(path).map_err(|e| e.to_string())?,
        Some(path) => {
            info!(
                "session file {} not found; starting from default form values",
                path.display()
            );
            SessionState::default()
        }
        None => SessionState::default(),
    };
    apply_overrides(&mut form, &config.fields);

    if config.save_session {
        if let Some(path) = &config.session_path {
            form.save(path).map_err(|e| e.to_string())?;
            info!("saved session to {}", path.display());
        }
    }

    let record = form
        .to_record()
        .map_err(|e| format!("invalid input: {e}"))?;

    let vector = encode(&record);
    debug!("encoded features: {:?}", vector.named().collect::<Vec<_>>());
    let prediction = predict_with_store(&vector, store, config.weights)
        .map_err(|e| format!("Prediction failed: {e}"))?;

    let thresholds = RiskThresholds::default_v1();
    let tier = classify(prediction.combined);
    info!(
        "combined probability {:.4} classified as {:?}",
        prediction.combined, tier
    );

    let report = build_report(&Stage4Input {
        record: &record,
        vector: &vector,
        prediction: &prediction,
        tier,
        thresholds: &thresholds,
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    });
    write_report(&report, config.format, config.out.as_deref()).map_err(|e| e.to_string())?;

    Ok(())
}

fn run_reset(session: &Path) -> Result<(), String> {
    SessionState::reset()
        .save(session)
        .map_err(|e| e.to_string())?;
    info!("session {} reset to defaults", session.display());
    Ok(())
}

fn apply_overrides(form: &mut SessionState, fields: &FieldArgs) {
    if let Some(v) = fields.age {
        form.age = v;
    }
    if let Some(v) = fields.sex {
        form.sex = match v {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        };
    }
    if let Some(v) = fields.chest_pain_type {
        form.chest_pain_type = v;
    }
    if let Some(v) = fields.resting_bp {
        form.resting_bp = v;
    }
    if let Some(v) = fields.cholesterol {
        form.cholesterol = v;
    }
    if let Some(v) = fields.fasting_bs {
        form.fasting_bs = v;
    }
    if let Some(v) = fields.resting_ecg {
        form.resting_ecg = v;
    }
    if let Some(v) = fields.max_heart_rate {
        form.max_heart_rate = v;
    }
    if let Some(v) = fields.exercise_angina {
        form.exercise_angina = v;
    }
    if let Some(v) = fields.st_depression {
        form.st_depression = v;
    }
    if let Some(v) = fields.slope {
        form.slope = v;
    }
    if let Some(v) = fields.major_vessels {
        form.major_vessels = v;
    }
    if let Some(v) = fields.thalassemia {
        form.thalassemia = v;
    }
}

fn resolve_models_dir(cli: Option<&Path>, exe: Option<&Path>) -> PathBuf {
    if let Some(dir) = cli {
        return dir.to_path_buf();
    }
    match exe.and_then(Path::parent) {
        Some(exe_dir) => exe_dir.join("..").join("models"),
        None => PathBuf::from("models"),
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
