use crate::model::thresholds::RiskThresholds;
use crate::model::tiers::RiskTier;

pub fn classify(probability: f64) -> RiskTier {
    classify_with(probability, &RiskThresholds::default_v1())
}

// Lower bounds are inclusive.
pub fn classify_with(probability: f64, thresholds: &RiskThresholds) -> RiskTier {
    if probability >= thresholds.high {
        RiskTier::High
    } else if probability >= thresholds.moderate {
        RiskTier::Moderate
    } else {
        RiskTier::Low
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_classify.rs"]
mod tests;
