use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::encoding::{ArtifactError, Encoder, FeatureSchema, ScalerParams, StandardScaler};
use super::model::{load_classifier, Classifier, ModelError};
use super::thresholds::{ResolvedThresholds, ThresholdError, ThresholdProvider, ThresholdSource, Thresholds};
use crate::config::ArtifactConfig;

/// Artifact categories required for the prediction capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Model,
    Scaler,
    FeatureColumns,
}

impl ArtifactKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Scaler => "scaler",
            Self::FeatureColumns => "feature columns",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("{} artifact not found at {}", .kind.label(), .path.display())]
    ArtifactMissing { kind: ArtifactKind, path: PathBuf },
    #[error("{} artifact at {} is unreadable: {source}", .kind.label(), .path.display())]
    ArtifactUnreadable {
        kind: ArtifactKind,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} artifact at {} is malformed: {source}", .kind.label(), .path.display())]
    ArtifactMalformed {
        kind: ArtifactKind,
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid schema or scaler artifact: {0}")]
    ArtifactInvalid(#[from] ArtifactError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("classifier expects {model} features but the schema lists {schema}")]
    WidthMismatch { model: usize, schema: usize },
    #[error("economic thresholds unavailable: {0}")]
    ThresholdUnavailable(#[from] ThresholdError),
}

/// Everything a prediction needs, loaded once and shared read-only.
#[derive(Debug)]
pub struct ModelContext {
    classifier: Arc<dyn Classifier>,
    encoder: Encoder,
    thresholds: ResolvedThresholds,
    loaded_at: DateTime<Utc>,
}

impl ModelContext {
    pub fn load(config: &ArtifactConfig) -> Result<Self, ContextError> {
        for (kind, path) in [
            (ArtifactKind::Model, &config.model_path),
            (ArtifactKind::Scaler, &config.scaler_path),
            (ArtifactKind::FeatureColumns, &config.feature_columns_path),
        ] {
            if !path.exists() {
                return Err(ContextError::ArtifactMissing {
                    kind,
                    path: path.clone(),
                });
            }
        }

        let columns: Vec<String> = read_json(ArtifactKind::FeatureColumns, &config.feature_columns_path)?;
        let schema = FeatureSchema::new(columns)?;
        let params: ScalerParams = read_json(ArtifactKind::Scaler, &config.scaler_path)?;
        let scaler = StandardScaler::from_params(params)?;
        let classifier = load_classifier(&config.model_path)?;

        let thresholds = ThresholdProvider::new(&config.thresholds_path, &config.dataset_path)
            .with_fallback(config.threshold_fallback)
            .resolve()?;

        let context = Self::from_parts(classifier, Encoder::new(schema, scaler), thresholds)?;
        info!(
            model = context.classifier.name(),
            features = context.encoder.schema().len(),
            scaled = context.encoder.scaler().len(),
            threshold_source = context.thresholds.source.label(),
            "model context loaded"
        );
        Ok(context)
    }

    pub fn from_parts(
        classifier: Arc<dyn Classifier>,
        encoder: Encoder,
        thresholds: ResolvedThresholds,
    ) -> Result<Self, ContextError> {
        if classifier.n_features() != encoder.schema().len() {
            return Err(ContextError::WidthMismatch {
                model: classifier.n_features(),
                schema: encoder.schema().len(),
            });
        }

        Ok(Self {
            classifier,
            encoder,
            thresholds,
            loaded_at: Utc::now(),
        })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds.thresholds
    }

    pub fn threshold_source(&self) -> ThresholdSource {
        self.thresholds.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            model: self.classifier.name(),
            n_features: self.encoder.schema().len(),
            scaled_columns: self.encoder.scaler().feature_names().map(str::to_string).collect(),
            probability_capable: self.classifier.supports_probability(),
            thresholds: self.thresholds,
            loaded_at: self.loaded_at,
        }
    }
}

/// Model info exposed to operators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub model: &'static str,
    pub n_features: usize,
    pub scaled_columns: Vec<String>,
    pub probability_capable: bool,
    pub thresholds: ResolvedThresholds,
    pub loaded_at: DateTime<Utc>,
}

fn read_json<T: serde::de::DeserializeOwned>(kind: ArtifactKind, path: &Path) -> Result<T, ContextError> {
    let file = std::fs::File::open(path).map_err(|source| ContextError::ArtifactUnreadable {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| {
        ContextError::ArtifactMalformed {
            kind,
            path: path.to_path_buf(),
            source,
        }
    })
}
