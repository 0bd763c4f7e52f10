use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{Classifier, ModelSpec, PredictionError};
use crate::pipeline::stage1_encode::FEATURE_NAMES;

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Could not find {name} model at {path}")]
    Missing { name: &'static str, path: String },
    #[error("could not read {name} model at {path}: {source}")]
    Io {
        name: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode {name} model at {path}: {source}")]
    Decode {
        name: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {name} model at {path}: {reason}")]
    Invalid {
        name: &'static str,
        path: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSlot {
    LogisticRegression,
    RandomForest,
}

impl ModelSlot {
    pub fn display_name(self) -> &'static str {
        match self {
            ModelSlot::LogisticRegression => "Logistic Regression",
            ModelSlot::RandomForest => "Random Forest",
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            ModelSlot::LogisticRegression => "logistic_regression_model",
            ModelSlot::RandomForest => "random_forest_model",
        }
    }
}

pub fn slot_order() -> &'static [ModelSlot] {
    &[ModelSlot::LogisticRegression, ModelSlot::RandomForest]
}

#[derive(Debug, Default)]
pub struct ModelStore {
    logistic: Option<Box<dyn Classifier>>,
    forest: Option<Box<dyn Classifier>>,
    load_errors: Vec<ModelLoadError>,
}

impl ModelStore {
    #[cfg(test)]
    pub fn from_models(
        logistic: Option<Box<dyn Classifier>>,
        forest: Option<Box<dyn Classifier>>,
    ) -> Self {
        Self {
            logistic,
            forest,
            load_errors: Vec::new(),
        }
    }

    pub fn load_dir(models_dir: &Path) -> Self {
        let mut store = Self::default();
        for &slot in slot_order() {
            let path = resolve_model_path(models_dir, slot);
            match load_model(&path, slot.display_name()) {
                Ok(model) => {
                    info!(
                        "loaded {} model ({}, {} features) from {}",
                        slot.display_name(),
                        model.kind(),
                        model.n_features(),
                        path.display()
                    );
                    store.set(slot, model);
                }
                Err(err) => {
                    debug!("{} slot left empty", slot.display_name());
                    store.load_errors.push(err);
                }
            }
        }
        store
    }

    fn set(&mut self, slot: ModelSlot, model: Box<dyn Classifier>) {
        match slot {
            ModelSlot::LogisticRegression => self.logistic = Some(model),
            ModelSlot::RandomForest => self.forest = Some(model),
        }
    }

    pub fn get(&self, slot: ModelSlot) -> Result<&dyn Classifier, PredictionError> {
        let model = match slot {
            ModelSlot::LogisticRegression => self.logistic.as_deref(),
            ModelSlot::RandomForest => self.forest.as_deref(),
        };
        model.ok_or(PredictionError::ModelUnavailable {
            name: slot.display_name(),
        })
    }

    pub fn load_errors(&self) -> &[ModelLoadError] {
        &self.load_errors
    }

    pub fn is_complete(&self) -> bool {
        self.logistic.is_some() && self.forest.is_some()
    }
}

// .json first, then .json.gz.
pub fn resolve_model_path(models_dir: &Path, slot: ModelSlot) -> PathBuf {
    let plain = models_dir.join(format!("{}.json", slot.file_stem()));
    if plain.exists() {
        return plain;
    }
    let gz = models_dir.join(format!("{}.json.gz", slot.file_stem()));
    if gz.exists() {
        debug!("using compressed model {}", gz.display());
        return gz;
    }
    plain
}

pub fn load_model(
    path: &Path,
    name: &'static str,
) -> Result<Box<dyn Classifier>, ModelLoadError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ModelLoadError::Missing {
                name,
                path: display.clone(),
            }
        } else {
            ModelLoadError::Io {
                name,
                path: display.clone(),
                source,
            }
        }
    })?;

    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let spec: ModelSpec = serde_json::from_reader(reader).map_err(|source| {
        if source.is_io() {
            ModelLoadError::Io {
                name,
                path: display.clone(),
                source: source.into(),
            }
        } else {
            ModelLoadError::Decode {
                name,
                path: display.clone(),
                source,
            }
        }
    })?;

    let invalid = |reason: String| ModelLoadError::Invalid {
        name,
        path: display.clone(),
        reason,
    };
    validate_spec(&spec).map_err(invalid)?;

    Ok(spec.into_classifier())
}

fn validate_spec(spec: &ModelSpec) -> Result<(), String> {
    let names = match spec {
        ModelSpec::LogisticRegression(m) => {
            m.validate()?;
            m.feature_names.as_deref()
        }
        ModelSpec::RandomForest(m) => {
            m.validate()?;
            m.feature_names.as_deref()
        }
    };
    if let Some(names) = names {
        check_feature_names(names)?;
    }
    Ok(())
}

fn check_feature_names(names: &[String]) -> Result<(), String> {
    if names.len() != FEATURE_NAMES.len() {
        return Err(format!(
            "model was trained on {} features, encoder produces {}",
            names.len(),
            FEATURE_NAMES.len()
        ));
    }
    for (idx, (got, expected)) in names.iter().zip(FEATURE_NAMES.iter()).enumerate() {
        if got != expected {
            return Err(format!(
                "feature {} is {:?}, encoder places {:?} there",
                idx, got, expected
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/store.rs"]
mod tests;
