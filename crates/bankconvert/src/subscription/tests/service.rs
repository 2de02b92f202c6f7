use super::common::*;
use std::sync::Arc;

use crate::subscription::context::{ContextError, ModelContext};
use crate::subscription::domain::{
    ProbabilityBand, ProbabilitySource, ProfileError, SubscriptionLabel,
};
use crate::subscription::features::AgeGroup;
use crate::subscription::recommendations::RecommendationRule;
use crate::subscription::service::PredictionError;
use crate::subscription::validation::InputWarning;

#[test]
fn likely_prediction_carries_model_probability_and_guidance() {
    let service = build_service(SubscriptionLabel::Likely, Some(0.64));

    let outcome = service.predict(&retiree_profile()).expect("prediction");

    assert_eq!(outcome.label, SubscriptionLabel::Likely);
    assert_eq!(outcome.probability, 0.64);
    assert_eq!(outcome.probability_source, ProbabilitySource::Model);
    assert_eq!(outcome.confidence, 0.64);
    assert_eq!(outcome.band, ProbabilityBand::High);
    assert_eq!(outcome.engineered.age_group, AgeGroup::Elderly);
    assert!(outcome.warnings.is_empty());
    assert_eq!(
        outcome.recommendations.first().map(String::as_str),
        Some(RecommendationRule::PriorSuccess.message())
    );
}

#[test]
fn missing_probability_capability_uses_marked_placeholder() {
    let likely = build_service(SubscriptionLabel::Likely, None)
        .predict(&profile())
        .expect("prediction");
    assert_eq!(likely.probability, 0.7);
    assert_eq!(likely.probability_source, ProbabilitySource::Placeholder);

    let unlikely = build_service(SubscriptionLabel::Unlikely, None)
        .predict(&profile())
        .expect("prediction");
    assert_eq!(unlikely.probability, 0.3);
    assert!((unlikely.confidence - 0.7).abs() < 1e-12);
    assert_eq!(unlikely.band, ProbabilityBand::Moderate);
}

#[test]
fn warnings_are_reported_without_blocking() {
    let service = build_service(SubscriptionLabel::Unlikely, Some(0.08));
    let mut profile = profile();
    profile.pdays = 50;

    let outcome = service.predict(&profile).expect("prediction still runs");

    assert_eq!(outcome.warnings, vec![InputWarning::ContactDaysWithoutContacts]);
    assert_eq!(outcome.band, ProbabilityBand::Low);
}

#[test]
fn out_of_range_input_fails_only_that_request() {
    let service = build_service(SubscriptionLabel::Likely, Some(0.9));
    let mut invalid = profile();
    invalid.age = 120;

    match service.predict(&invalid) {
        Err(PredictionError::InvalidProfile(ProfileError::AgeOutOfRange(120))) => {}
        other => panic!("expected age error, got {other:?}"),
    }

    assert!(service.predict(&profile()).is_ok());
}

#[test]
fn probability_outside_unit_interval_is_clamped() {
    let outcome = build_service(SubscriptionLabel::Likely, Some(1.2))
        .predict(&profile())
        .expect("prediction");
    assert_eq!(outcome.probability, 1.0);
}

#[test]
fn context_rejects_classifier_of_wrong_width() {
    let classifier = Arc::new(FixedClassifier {
        label: SubscriptionLabel::Likely,
        probability: None,
        n_features: 60,
    });

    match ModelContext::from_parts(classifier, encoder(), fallback_thresholds()) {
        Err(ContextError::WidthMismatch { model: 60, schema: 61 }) => {}
        other => panic!("expected width mismatch, got {other:?}"),
    }
}
