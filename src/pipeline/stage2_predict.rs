use tracing::{debug, warn};

use crate::model::store::{ModelSlot, ModelStore};
use crate::model::thresholds::ModelWeights;
use crate::model::{Classifier, PredictionError, positive_class_probability};
use crate::pipeline::stage1_encode::{FeatureVector, unchecked_ranges};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub logistic: f64,
    pub forest: f64,
    pub combined: f64,
}

pub fn predict(
    vector: &FeatureVector,
    logistic: &dyn Classifier,
    forest: &dyn Classifier,
) -> Result<Prediction, PredictionError> {
    predict_weighted(vector, logistic, forest, ModelWeights::default())
}

pub fn predict_weighted(
    vector: &FeatureVector,
    logistic: &dyn Classifier,
    forest: &dyn Classifier,
    weights: ModelWeights,
) -> Result<Prediction, PredictionError> {
    check_weights(&weights)?;

    let p_lr = positive_class_probability(logistic, vector.as_slice())?;
    let p_rf = positive_class_probability(forest, vector.as_slice())?;

    // Plain mean for equal weights.
    let combined = if weights.is_equal() {
        (p_lr + p_rf) / 2.0
    } else {
        (weights.logistic * p_lr + weights.forest * p_rf) / (weights.logistic + weights.forest)
    };
    debug!(
        "positive-class probabilities: lr={:.6} rf={:.6} combined={:.6}",
        p_lr, p_rf, combined
    );

    Ok(Prediction {
        logistic: p_lr,
        forest: p_rf,
        combined: combined.clamp(0.0, 1.0),
    })
}

pub fn predict_with_store(
    vector: &FeatureVector,
    store: &ModelStore,
    weights: ModelWeights,
) -> Result<Prediction, PredictionError> {
    let flagged = unchecked_ranges(vector);
    if !flagged.is_empty() {
        warn!(
            "values outside plausible clinical ranges passed to the models unchanged: {}",
            flagged.join(", ")
        );
    }
    let logistic = store.get(ModelSlot::LogisticRegression)?;
    let forest = store.get(ModelSlot::RandomForest)?;
    if weights == ModelWeights::default() {
        predict(vector, logistic, forest)
    } else {
        predict_weighted(vector, logistic, forest, weights)
    }
}

fn check_weights(weights: &ModelWeights) -> Result<(), PredictionError> {
    for (name, w) in [("logistic", weights.logistic), ("forest", weights.forest)] {
        if !w.is_finite() || w < 0.0 {
            return Err(PredictionError::InvalidWeights(format!(
                "{} weight must be finite and non-negative, got {}",
                name, w
            )));
        }
    }
    if weights.logistic + weights.forest <= 0.0 {
        return Err(PredictionError::InvalidWeights(
            "weights sum to zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_predict.rs"]
mod tests;
