//! Term deposit subscription scoring pipeline.
//!
//! A request flows through threshold lookup, feature engineering, encoding, the classifier, and
//! the recommendation rules. Input validation runs beside the pipeline and never blocks it.

pub mod context;
pub mod domain;
pub mod encoding;
pub mod features;
pub mod model;
pub mod recommendations;
pub mod router;
pub mod service;
pub mod thresholds;
pub mod validation;

#[cfg(test)]
mod tests;

pub use context::{ArtifactKind, ContextError, ModelContext, ModelSummary};
pub use domain::{
    Category, ContactDay, ContactMethod, ContactMonth, CreditDefault, CustomerProfile, Education,
    HousingLoan, Job, MaritalStatus, PersonalLoan, PredictionResult, PreviousOutcome,
    ProbabilityBand, ProbabilitySource, ProfileError, SubscriptionLabel,
};
pub use encoding::{Encoder, FeatureSchema, FeatureVector, SchemaError, ScalerParams, StandardScaler};
pub use features::{engineer, AgeGroup, ContactRecency, EconomicCondition, EngineeredFeatures};
pub use model::{Classifier, ModelArtifact, ModelError};
pub use recommendations::{recommend, BusinessInsights, RecommendationRule};
pub use router::{subscription_router, PredictionCapability};
pub use service::{PredictionError, PredictionOutcome, PredictionService};
pub use thresholds::{
    ResolvedThresholds, ThresholdError, ThresholdProvider, ThresholdSource, Thresholds,
    FALLBACK_THRESHOLDS,
};
pub use validation::{validate, InputWarning};
