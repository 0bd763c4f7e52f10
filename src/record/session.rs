use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{
    AGE_MAX, AGE_MIN, ChestPainType, ClinicalRecord, MAJOR_VESSELS_MAX, RecordError, RestingEcg,
    Sex, StSlope, Thalassemia, flag_from_code,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error on session file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "Sex")]
    pub sex: Sex,
    #[serde(rename = "Chest_Pain_Type")]
    pub chest_pain_type: u8,
    #[serde(rename = "Resting_BP")]
    pub resting_bp: i32,
    #[serde(rename = "Cholesterol")]
    pub cholesterol: i32,
    #[serde(rename = "Fasting_BS")]
    pub fasting_bs: u8,
    #[serde(rename = "Resting_ECG")]
    pub resting_ecg: u8,
    #[serde(rename = "Max_Heart_Rate")]
    pub max_heart_rate: i32,
    #[serde(rename = "Exercise_Angina")]
    pub exercise_angina: u8,
    #[serde(rename = "ST_Depression")]
    pub st_depression: f64,
    #[serde(rename = "Slope")]
    pub slope: u8,
    #[serde(rename = "Major_Vessels")]
    pub major_vessels: i64,
    #[serde(rename = "Thalassemia")]
    pub thalassemia: u8,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            age: 50,
            sex: Sex::Male,
            chest_pain_type: 0,
            resting_bp: 120,
            cholesterol: 200,
            fasting_bs: 0,
            resting_ecg: 0,
            max_heart_rate: 150,
            exercise_angina: 0,
            st_depression: 1.0,
            slope: 0,
            major_vessels: 0,
            thalassemia: 0,
        }
    }
}

impl SessionState {
    // Age resets to 100; the initial form starts at 50.
    pub fn reset() -> Self {
        Self {
            age: 100,
            ..Self::default()
        }
    }

    pub fn to_record(&self) -> Result<ClinicalRecord, RecordError> {
        let age = check_bounds("Age", self.age, AGE_MIN as i64, AGE_MAX as i64)?;
        let major_vessels = check_bounds(
            "Major_Vessels",
            self.major_vessels,
            0,
            MAJOR_VESSELS_MAX as i64,
        )?;
        if !self.st_depression.is_finite() {
            return Err(RecordError::NonFinite {
                field: "ST_Depression",
            });
        }

        Ok(ClinicalRecord {
            age: age as u32,
            sex: self.sex,
            chest_pain_type: ChestPainType::try_from(self.chest_pain_type)?,
            resting_bp: self.resting_bp,
            cholesterol: self.cholesterol,
            fasting_bs: flag_from_code("Fasting_BS", self.fasting_bs)?,
            resting_ecg: RestingEcg::try_from(self.resting_ecg)?,
            max_heart_rate: self.max_heart_rate,
            exercise_angina: flag_from_code("Exercise_Angina", self.exercise_angina)?,
            st_depression: self.st_depression,
            slope: StSlope::try_from(self.slope)?,
            major_vessels: major_vessels as u8,
            thalassemia: Thalassemia::try_from(self.thalassemia)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let text = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SessionError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let mut json = serde_json::to_string_pretty(self).map_err(|source| SessionError::Json {
            path: path.display().to_string(),
            source,
        })?;
        json.push('\n');
        fs::write(path, json).map_err(io_err)
    }
}

fn check_bounds(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64, RecordError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(RecordError::OutOfBounds {
            field,
            min,
            max,
            value,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/record/session.rs"]
mod tests;
