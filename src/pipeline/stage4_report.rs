use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::model::thresholds::RiskThresholds;
use crate::model::tiers::RiskTier;
use crate::pipeline::stage1_encode::{FEATURE_NAMES, FeatureVector, unchecked_ranges};
use crate::pipeline::stage2_predict::Prediction;
use crate::record::ClinicalRecord;
use crate::report::json::render_report_json;
use crate::report::text::render_report_text;
use crate::report::{InputEcho, Probabilities, RiskReport, ToolMeta, build_gauge};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Stage4Input<'a> {
    pub record: &'a ClinicalRecord,
    pub vector: &'a FeatureVector,
    pub prediction: &'a Prediction,
    pub tier: RiskTier,
    pub thresholds: &'a RiskThresholds,
    pub tool_name: String,
    pub tool_version: String,
}

pub fn build_report(input: &Stage4Input<'_>) -> RiskReport {
    let warnings = unchecked_ranges(input.vector)
        .into_iter()
        .map(|name| format!("{} is outside the usual clinical range and was not validated", name))
        .collect();

    RiskReport {
        tool: ToolMeta {
            name: input.tool_name.clone(),
            version: input.tool_version.clone(),
        },
        inputs: echo_inputs(input.record),
        probabilities: Probabilities {
            logistic_regression: input.prediction.logistic,
            random_forest: input.prediction.forest,
            combined: input.prediction.combined,
        },
        tier: input.tier,
        label: input.tier.label(),
        headline: input.tier.headline(),
        advisory: input.tier.advisory(),
        color: input.tier.color(),
        gauge: build_gauge(input.prediction.combined, input.tier, input.thresholds),
        warnings,
    }
}

fn echo_inputs(record: &ClinicalRecord) -> Vec<InputEcho> {
    let yes_no = |v: bool| if v { "Yes" } else { "No" };
    let rows: [(String, Option<&'static str>); 13] = [
        (record.age.to_string(), None),
        (record.sex.label().to_string(), None),
        (
            record.chest_pain_type.code().to_string(),
            Some(record.chest_pain_type.description()),
        ),
        (record.resting_bp.to_string(), Some("mmHg")),
        (record.cholesterol.to_string(), Some("mg/dl")),
        ((record.fasting_bs as u8).to_string(), Some(yes_no(record.fasting_bs))),
        (
            record.resting_ecg.code().to_string(),
            Some(record.resting_ecg.description()),
        ),
        (record.max_heart_rate.to_string(), None),
        (
            (record.exercise_angina as u8).to_string(),
            Some(yes_no(record.exercise_angina)),
        ),
        (record.st_depression.to_string(), None),
        (record.slope.code().to_string(), Some(record.slope.description())),
        (record.major_vessels.to_string(), None),
        (
            record.thalassemia.code().to_string(),
            Some(record.thalassemia.description()),
        ),
    ];

    FEATURE_NAMES
        .iter()
        .zip(rows)
        .map(|(&name, (value, description))| InputEcho {
            name,
            value,
            description,
        })
        .collect()
}

pub fn render_report(report: &RiskReport, format: ReportFormat) -> io::Result<String> {
    match format {
        ReportFormat::Text => Ok(render_report_text(report)),
        ReportFormat::Json => render_report_json(report).map_err(io::Error::from),
    }
}

pub fn write_report(
    report: &RiskReport,
    format: ReportFormat,
    out: Option<&Path>,
) -> io::Result<()> {
    let rendered = render_report(report, format)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, rendered)
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(rendered.as_bytes())?;
            lock.flush()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;
