use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::context::ModelContext;
use super::domain::{
    CustomerProfile, PredictionResult, ProbabilityBand, ProbabilitySource, ProfileError,
    SubscriptionLabel,
};
use super::encoding::SchemaError;
use super::features::{engineer, EngineeredFeatures};
use super::recommendations::{recommend, BusinessInsights};
use super::validation::{validate, InputWarning};

/// Full response for one scored profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub label: SubscriptionLabel,
    pub label_text: &'static str,
    pub probability: f64,
    pub probability_source: ProbabilitySource,
    pub confidence: f64,
    pub band: ProbabilityBand,
    pub warnings: Vec<InputWarning>,
    pub recommendations: Vec<String>,
    pub insights: BusinessInsights,
    pub engineered: EngineeredFeatures,
    pub evaluated_at: DateTime<Utc>,
}

/// Request boundary over a loaded [`ModelContext`].
#[derive(Debug, Clone)]
pub struct PredictionService {
    context: Arc<ModelContext>,
}

impl PredictionService {
    pub fn new(context: Arc<ModelContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ModelContext {
        &self.context
    }

    pub fn predict(&self, profile: &CustomerProfile) -> Result<PredictionOutcome, PredictionError> {
        profile.check_domain()?;
        let warnings = validate(profile);

        let engineered = engineer(profile, self.context.thresholds());
        let vector = self.context.encoder().encode(profile, &engineered)?;

        let classifier = self.context.classifier();
        if vector.len() != classifier.n_features() {
            return Err(SchemaError::LengthMismatch {
                expected: classifier.n_features(),
                found: vector.len(),
            }
            .into());
        }

        let label = classifier.predict(vector.as_slice());
        let prediction = match classifier.predict_proba(vector.as_slice()) {
            Some(probability) => PredictionResult::from_model(label, probability),
            None => PredictionResult::placeholder(label),
        };

        debug!(
            label = label.class(),
            probability = prediction.probability,
            source = ?prediction.probability_source,
            warnings = warnings.len(),
            "profile scored"
        );

        Ok(PredictionOutcome {
            label,
            label_text: label.label(),
            probability: prediction.probability,
            probability_source: prediction.probability_source,
            confidence: prediction.confidence(),
            band: prediction.band(),
            warnings,
            recommendations: recommend(&prediction, profile),
            insights: BusinessInsights::for_profile(profile),
            engineered,
            evaluated_at: Utc::now(),
        })
    }
}

/// Per-request failure; later requests are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    InvalidProfile(#[from] ProfileError),
    #[error("schema mismatch: {0}")]
    Schema(#[from] SchemaError),
}
