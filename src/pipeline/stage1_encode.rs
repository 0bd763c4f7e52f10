use crate::record::ClinicalRecord;

pub const N_FEATURES: usize = 13;

pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "Age",
    "Sex",
    "Chest_Pain_Type",
    "Resting_BP",
    "Cholesterol",
    "Fasting_BS",
    "Resting_ECG",
    "Max_Heart_Rate",
    "Exercise_Angina",
    "ST_Depression",
    "Slope",
    "Major_Vessels",
    "Thalassemia",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; N_FEATURES]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

pub fn encode(record: &ClinicalRecord) -> FeatureVector {
    FeatureVector([
        record.age as f64,
        record.sex.code() as f64,
        record.chest_pain_type.code() as f64,
        record.resting_bp as f64,
        record.cholesterol as f64,
        flag(record.fasting_bs),
        record.resting_ecg.code() as f64,
        record.max_heart_rate as f64,
        flag(record.exercise_angina),
        record.st_depression,
        record.slope.code() as f64,
        record.major_vessels as f64,
        record.thalassemia.code() as f64,
    ])
}

fn flag(v: bool) -> f64 {
    if v { 1.0 } else { 0.0 }
}

// Advisory only; values outside these ranges are still encoded as-is.
const PLAUSIBLE_RANGES: &[(usize, f64, f64)] = &[
    (3, 50.0, 250.0),
    (4, 50.0, 700.0),
    (7, 40.0, 250.0),
    (9, -5.0, 10.0),
];

pub fn unchecked_ranges(vector: &FeatureVector) -> Vec<&'static str> {
    let mut out = Vec::new();
    for &(idx, lo, hi) in PLAUSIBLE_RANGES {
        let v = vector.0[idx];
        if !(lo..=hi).contains(&v) {
            out.push(FEATURE_NAMES[idx]);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_encode.rs"]
mod tests;
