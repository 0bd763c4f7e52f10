pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::thresholds::RiskThresholds;
use crate::model::tiers::{RiskTier, tier_order};

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputEcho {
    pub name: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Probabilities {
    pub logistic_regression: f64,
    pub random_forest: f64,
    pub combined: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugeStep {
    pub range: [f64; 2],
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugeSpec {
    pub title: &'static str,
    pub value: f64,
    pub axis: [f64; 2],
    pub bar_color: &'static str,
    pub steps: Vec<GaugeStep>,
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub tool: ToolMeta,
    pub inputs: Vec<InputEcho>,
    pub probabilities: Probabilities,
    pub tier: RiskTier,
    pub label: &'static str,
    pub headline: &'static str,
    pub advisory: &'static str,
    pub color: &'static str,
    pub gauge: GaugeSpec,
    pub warnings: Vec<String>,
}

pub fn step_color(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => "lightgreen",
        RiskTier::Moderate => "gold",
        RiskTier::High => "lightcoral",
    }
}

pub fn build_gauge(probability: f64, tier: RiskTier, thresholds: &RiskThresholds) -> GaugeSpec {
    let value = probability * 100.0;
    let mut steps = Vec::with_capacity(3);
    for def in tier_order() {
        let range = match def.tier {
            RiskTier::Low => [0.0, thresholds.moderate * 100.0],
            RiskTier::Moderate => [thresholds.moderate * 100.0, thresholds.high * 100.0],
            RiskTier::High => [thresholds.high * 100.0, 100.0],
        };
        steps.push(GaugeStep {
            range,
            color: step_color(def.tier),
        });
    }
    GaugeSpec {
        title: "Predicted Heart Disease Risk (%)",
        value,
        axis: [0.0, 100.0],
        bar_color: tier.color(),
        steps,
        threshold: value,
    }
}

pub fn format_prob(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}
