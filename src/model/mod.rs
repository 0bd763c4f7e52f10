pub mod forest;
pub mod logistic;
pub mod store;
pub mod thresholds;
pub mod tiers;

use serde::Deserialize;
use thiserror::Error;

use crate::model::forest::RandomForest;
use crate::model::logistic::LogisticRegression;

pub const POSITIVE_CLASS: usize = 1;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictionError {
    #[error("{name} model is not loaded")]
    ModelUnavailable { name: &'static str },
    #[error("{model} expects {expected} features, got {got}")]
    FeatureCount {
        model: String,
        expected: usize,
        got: usize,
    },
    #[error("{model} returned {n_classes} class probabilities; a positive class is required")]
    MissingPositiveClass { model: String, n_classes: usize },
    #[error("{model} returned invalid probability {value}")]
    InvalidProbability { model: String, value: f64 },
    #[error("invalid model weights: {0}")]
    InvalidWeights(String),
}

pub trait Classifier: std::fmt::Debug + Send + Sync {
    fn kind(&self) -> &'static str;

    fn n_features(&self) -> usize;

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError>;

    fn check_features(&self, features: &[f64]) -> Result<(), PredictionError> {
        if features.len() != self.n_features() {
            return Err(PredictionError::FeatureCount {
                model: self.kind().to_string(),
                expected: self.n_features(),
                got: features.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
}

impl ModelSpec {
    pub fn into_classifier(self) -> Box<dyn Classifier> {
        match self {
            ModelSpec::LogisticRegression(m) => Box::new(m),
            ModelSpec::RandomForest(m) => Box::new(m),
        }
    }
}

pub fn positive_class_probability(
    model: &dyn Classifier,
    features: &[f64],
) -> Result<f64, PredictionError> {
    let proba = model.predict_proba(features)?;
    let Some(&p) = proba.get(POSITIVE_CLASS) else {
        return Err(PredictionError::MissingPositiveClass {
            model: model.kind().to_string(),
            n_classes: proba.len(),
        });
    };
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(PredictionError::InvalidProbability {
            model: model.kind().to_string(),
            value: p,
        });
    }
    Ok(p)
}
