//! Classifier capability and readers for the exported model families.

mod forest;
mod linear;

pub use forest::{DecisionTree, ForestParams, RandomForest};
pub use linear::{LinearParams, LinearSvc, LogisticRegression};

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::domain::SubscriptionLabel;

/// Trained binary classifier over a schema-aligned feature vector.
///
/// Inputs are always `n_features()` long; callers check the width before invoking.
pub trait Classifier: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn n_features(&self) -> usize;

    fn predict(&self, features: &[f64]) -> SubscriptionLabel;

    /// Probability of class 1, or `None` when the model has no probability capability.
    fn predict_proba(&self, features: &[f64]) -> Option<f64>;

    fn supports_probability(&self) -> bool {
        true
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("model export is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model export is invalid: {0}")]
    Invalid(String),
}

/// JSON export of a fitted model, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LinearParams),
    LinearSvc(LinearParams),
    RandomForest(ForestParams),
}

impl ModelArtifact {
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let file = std::fs::File::open(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, ModelError> {
        Ok(match self {
            Self::LogisticRegression(params) => Arc::new(LogisticRegression::new(params)?),
            Self::LinearSvc(params) => Arc::new(LinearSvc::new(params)?),
            Self::RandomForest(params) => Arc::new(RandomForest::new(params)?),
        })
    }
}

pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>, ModelError> {
    ModelArtifact::from_path(path)?.into_classifier()
}
