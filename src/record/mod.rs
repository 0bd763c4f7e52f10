pub mod session;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const AGE_MIN: u32 = 1;
pub const AGE_MAX: u32 = 120;
pub const MAJOR_VESSELS_MAX: u8 = 3;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfBounds {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("{field} has no category with code {code}")]
    UnknownCode { field: &'static str, code: u8 },
    #[error("{field} must be 0 or 1, got {value}")]
    NotAFlag { field: &'static str, value: u8 },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn code(self) -> u8 {
        match self {
            Sex::Male => 1,
            Sex::Female => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChestPainType {
    Typical,
    Atypical,
    NonAnginal,
    Asymptomatic,
}

impl ChestPainType {
    pub fn code(self) -> u8 {
        match self {
            ChestPainType::Typical => 0,
            ChestPainType::Atypical => 1,
            ChestPainType::NonAnginal => 2,
            ChestPainType::Asymptomatic => 3,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ChestPainType::Typical => "Typical",
            ChestPainType::Atypical => "Atypical",
            ChestPainType::NonAnginal => "Non-anginal",
            ChestPainType::Asymptomatic => "Asymptomatic",
        }
    }
}

impl TryFrom<u8> for ChestPainType {
    type Error = RecordError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ChestPainType::Typical),
            1 => Ok(ChestPainType::Atypical),
            2 => Ok(ChestPainType::NonAnginal),
            3 => Ok(ChestPainType::Asymptomatic),
            _ => Err(RecordError::UnknownCode {
                field: "Chest_Pain_Type",
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestingEcg {
    Normal,
    StTAbnormality,
    LvHypertrophy,
}

impl RestingEcg {
    pub fn code(self) -> u8 {
        match self {
            RestingEcg::Normal => 0,
            RestingEcg::StTAbnormality => 1,
            RestingEcg::LvHypertrophy => 2,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RestingEcg::Normal => "Normal",
            RestingEcg::StTAbnormality => "ST-T Wave Abnormality",
            RestingEcg::LvHypertrophy => "LV Hypertrophy",
        }
    }
}

impl TryFrom<u8> for RestingEcg {
    type Error = RecordError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RestingEcg::Normal),
            1 => Ok(RestingEcg::StTAbnormality),
            2 => Ok(RestingEcg::LvHypertrophy),
            _ => Err(RecordError::UnknownCode {
                field: "Resting_ECG",
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StSlope {
    Upsloping,
    Flat,
    Downsloping,
}

impl StSlope {
    pub fn code(self) -> u8 {
        match self {
            StSlope::Upsloping => 0,
            StSlope::Flat => 1,
            StSlope::Downsloping => 2,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StSlope::Upsloping => "Upsloping",
            StSlope::Flat => "Flat",
            StSlope::Downsloping => "Downsloping",
        }
    }
}

impl TryFrom<u8> for StSlope {
    type Error = RecordError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(StSlope::Upsloping),
            1 => Ok(StSlope::Flat),
            2 => Ok(StSlope::Downsloping),
            _ => Err(RecordError::UnknownCode {
                field: "Slope",
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thalassemia {
    Normal,
    FixedDefect,
    ReversibleDefect,
}

impl Thalassemia {
    pub fn code(self) -> u8 {
        match self {
            Thalassemia::Normal => 0,
            Thalassemia::FixedDefect => 1,
            Thalassemia::ReversibleDefect => 2,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Thalassemia::Normal => "Normal",
            Thalassemia::FixedDefect => "Fixed Defect",
            Thalassemia::ReversibleDefect => "Reversible Defect",
        }
    }
}

impl TryFrom<u8> for Thalassemia {
    type Error = RecordError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Thalassemia::Normal),
            1 => Ok(Thalassemia::FixedDefect),
            2 => Ok(Thalassemia::ReversibleDefect),
            _ => Err(RecordError::UnknownCode {
                field: "Thalassemia",
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClinicalRecord {
    pub age: u32,
    pub sex: Sex,
    pub chest_pain_type: ChestPainType,
    pub resting_bp: i32,
    pub cholesterol: i32,
    pub fasting_bs: bool,
    pub resting_ecg: RestingEcg,
    pub max_heart_rate: i32,
    pub exercise_angina: bool,
    pub st_depression: f64,
    pub slope: StSlope,
    pub major_vessels: u8,
    pub thalassemia: Thalassemia,
}

pub(crate) fn flag_from_code(field: &'static str, value: u8) -> Result<bool, RecordError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(RecordError::NotAFlag { field, value }),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/record/tests.rs"]
mod tests;
