use serde::Deserialize;

use crate::model::{Classifier, PredictionError};

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl LogisticRegression {
    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("logistic regression has no coefficients".to_string());
        }
        if let Some(idx) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(format!("coefficient {} is not finite", idx));
        }
        if !self.intercept.is_finite() {
            return Err("intercept is not finite".to_string());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.coefficients.len() {
                return Err(format!(
                    "{} feature names for {} coefficients",
                    names.len(),
                    self.coefficients.len()
                ));
            }
        }
        Ok(())
    }

    pub fn decision_function(&self, features: &[f64]) -> f64 {
        let mut z = self.intercept;
        for (w, x) in self.coefficients.iter().zip(features) {
            z += w * x;
        }
        z
    }
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        self.check_features(features)?;
        let p = sigmoid(self.decision_function(features));
        Ok(vec![1.0 - p, p])
    }
}

// Split by sign so exp never overflows.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/logistic.rs"]
mod tests;
