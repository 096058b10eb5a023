pub mod predictor;
pub mod source;
pub mod store;

pub use predictor::{FeatureContribution, LinearPredictor};
pub use source::ModelSource;
pub use store::ModelStore;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

const EXPECTED_MODEL_TYPE: &str = "logistic_regression";

/// Source errors sit behind `Arc` so one failed load can be handed to every
/// caller that waited on it
#[derive(Debug, Clone, Error)]
pub enum ModelLoadError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("failed to fetch model from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Arc<reqwest::Error>,
    },

    #[error("model server {url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("model document is not valid JSON: {0}")]
    Parse(#[source] Arc<serde_json::Error>),

    #[error("model document is missing field `{0}`")]
    MissingField(&'static str),

    #[error("model has {names} feature names but {coefficients} coefficients")]
    LengthMismatch { names: usize, coefficients: usize },
}

impl From<serde_json::Error> for ModelLoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(Arc::new(e))
    }
}

/// Model document as produced by the training pipeline; every field optional
/// so that a missing one can be reported by name
#[derive(Debug, Deserialize)]
struct RawModelDocument {
    #[serde(rename = "type")]
    model_type: Option<String>,
    feature_names: Option<Vec<String>>,
    coefficients: Option<Vec<f64>>,
    intercept: Option<f64>,
}

/// Logistic regression weights, positionally aligned with `feature_names`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelParameters {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl ModelParameters {
    pub fn new(
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, ModelLoadError> {
        if feature_names.len() != coefficients.len() {
            return Err(ModelLoadError::LengthMismatch {
                names: feature_names.len(),
                coefficients: coefficients.len(),
            });
        }

        Ok(Self {
            feature_names,
            coefficients,
            intercept,
        })
    }

    /// Parse and structurally validate a model JSON document
    pub fn from_json(content: &str) -> Result<Self, ModelLoadError> {
        let raw: RawModelDocument = serde_json::from_str(content)?;

        if let Some(model_type) = raw.model_type.as_deref() {
            if model_type != EXPECTED_MODEL_TYPE {
                log::warn!(
                    "Model declares type {:?}, scoring it as {}",
                    model_type,
                    EXPECTED_MODEL_TYPE
                );
            }
        }

        let feature_names = raw
            .feature_names
            .ok_or(ModelLoadError::MissingField("feature_names"))?;
        let coefficients = raw
            .coefficients
            .ok_or(ModelLoadError::MissingField("coefficients"))?;
        let intercept = raw
            .intercept
            .ok_or(ModelLoadError::MissingField("intercept"))?;

        Self::new(feature_names, coefficients, intercept)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }

    /// (name, coefficient) pairs in model order
    pub fn weights(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.feature_names
            .iter()
            .map(String::as_str)
            .zip(self.coefficients.iter().copied())
    }
}
