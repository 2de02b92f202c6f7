use std::path::{Path, PathBuf};
use std::sync::Arc;

use bankconvert::config::ArtifactConfig;
use bankconvert::subscription::{
    ArtifactKind, ContactDay, ContactMethod, ContactMonth, ContextError, CreditDefault,
    CustomerProfile, Education, HousingLoan, Job, MaritalStatus, ModelContext, PersonalLoan,
    PredictionService, PreviousOutcome, ProbabilitySource, RecommendationRule, SubscriptionLabel,
    ThresholdSource,
};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_config() -> ArtifactConfig {
    let mut config = ArtifactConfig::in_dir(fixtures().join("artifacts"));
    config.dataset_path = fixtures().join("absent.csv");
    config
}

/// Copy the fixture artifacts into a scratch directory so single files can be swapped out.
fn scratch_artifacts() -> (tempfile::TempDir, ArtifactConfig) {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in ["best_model.json", "scaler.json", "feature_columns.json", "thresholds.json"] {
        std::fs::copy(fixtures().join("artifacts").join(name), dir.path().join(name))
            .expect("copy fixture");
    }
    let mut config = ArtifactConfig::in_dir(dir.path());
    config.dataset_path = dir.path().join("absent.csv");
    (dir, config)
}

fn service(config: &ArtifactConfig) -> PredictionService {
    let context = ModelContext::load(config).expect("fixture artifacts load");
    PredictionService::new(Arc::new(context))
}

fn retiree() -> CustomerProfile {
    CustomerProfile {
        age: 70,
        job: Job::Retired,
        marital: MaritalStatus::Married,
        education: Education::UniversityDegree,
        default: CreditDefault::No,
        housing: HousingLoan::No,
        loan: PersonalLoan::No,
        contact: ContactMethod::Cellular,
        month: ContactMonth::Oct,
        day_of_week: ContactDay::Wed,
        pdays: 5,
        previous: 2,
        poutcome: PreviousOutcome::Success,
        emp_var_rate: -1.8,
        cons_price_idx: 92.893,
        cons_conf_idx: -46.2,
        euribor3m: 1.313,
        nr_employed: 5099.1,
    }
}

fn first_time_prospect() -> CustomerProfile {
    CustomerProfile {
        age: 41,
        job: Job::Technician,
        housing: HousingLoan::Yes,
        contact: ContactMethod::Telephone,
        month: ContactMonth::May,
        pdays: 999,
        previous: 0,
        poutcome: PreviousOutcome::Nonexistent,
        emp_var_rate: 1.1,
        cons_price_idx: 93.994,
        cons_conf_idx: -36.4,
        euribor3m: 4.857,
        nr_employed: 5191.0,
        ..retiree()
    }
}

#[test]
fn exported_logistic_model_scores_retiree_as_likely() {
    let service = service(&fixture_config());
    assert_eq!(service.context().threshold_source(), ThresholdSource::Artifact);

    let outcome = service.predict(&retiree()).expect("prediction");

    assert_eq!(outcome.label, SubscriptionLabel::Likely);
    assert_eq!(outcome.probability_source, ProbabilitySource::Model);
    assert!((outcome.probability - 0.999_368_307).abs() < 1e-6);

    let expected: Vec<String> = [
        RecommendationRule::PriorSuccess,
        RecommendationRule::Retirement,
        RecommendationRule::WeakEconomy,
        RecommendationRule::DebtFree,
        RecommendationRule::MobileFollowUp,
    ]
    .iter()
    .map(|rule| rule.message().to_string())
    .collect();
    assert_eq!(outcome.recommendations, expected);
}

#[test]
fn exported_logistic_model_scores_first_time_prospect_as_unlikely() {
    let outcome = service(&fixture_config())
        .predict(&first_time_prospect())
        .expect("prediction");

    assert_eq!(outcome.label, SubscriptionLabel::Unlikely);
    assert!((outcome.probability - 0.020_901_810).abs() < 1e-6);
    assert_eq!(
        outcome.recommendations,
        vec![
            RecommendationRule::FirstContact.message().to_string(),
            RecommendationRule::StrongEconomy.message().to_string(),
        ]
    );
}

#[test]
fn margin_model_falls_back_to_placeholder_probability() {
    let (dir, config) = scratch_artifacts();
    std::fs::copy(fixtures().join("linear_svc.json"), dir.path().join("best_model.json"))
        .expect("swap model");

    let service = service(&config);
    assert!(!service.context().summary().probability_capable);

    let likely = service.predict(&retiree()).expect("prediction");
    assert_eq!(likely.label, SubscriptionLabel::Likely);
    assert_eq!(likely.probability, 0.7);
    assert_eq!(likely.probability_source, ProbabilitySource::Placeholder);

    let unlikely = service.predict(&first_time_prospect()).expect("prediction");
    assert_eq!(unlikely.probability, 0.3);
}

#[test]
fn forest_export_averages_tree_votes() {
    let (dir, config) = scratch_artifacts();
    std::fs::copy(fixtures().join("random_forest.json"), dir.path().join("best_model.json"))
        .expect("swap model");

    let service = service(&config);
    let outcome = service.predict(&retiree()).expect("prediction");

    assert_eq!(service.context().classifier().name(), "random_forest");
    assert!((outcome.probability - 0.45).abs() < 1e-12);
    assert_eq!(outcome.label, SubscriptionLabel::Unlikely);
}

#[test]
fn missing_model_artifact_is_reported_by_kind() {
    let (dir, config) = scratch_artifacts();
    std::fs::remove_file(dir.path().join("best_model.json")).expect("remove model");

    match ModelContext::load(&config) {
        Err(ContextError::ArtifactMissing { kind, path }) => {
            assert_eq!(kind, ArtifactKind::Model);
            assert_eq!(path, dir.path().join("best_model.json"));
        }
        other => panic!("expected missing model, got {other:?}"),
    }
}

#[test]
fn schema_wider_than_model_is_rejected_at_load() {
    let (dir, config) = scratch_artifacts();
    let path = dir.path().join("feature_columns.json");
    let mut columns: Vec<String> =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read columns"))
            .expect("column list");
    columns.push("duration".to_string());
    std::fs::write(&path, serde_json::to_vec(&columns).expect("serialize")).expect("write columns");

    assert!(matches!(
        ModelContext::load(&config),
        Err(ContextError::WidthMismatch {
            model: 61,
            schema: 62
        })
    ));
}

#[test]
fn duplicated_schema_column_is_an_invalid_artifact() {
    let (dir, config) = scratch_artifacts();
    std::fs::write(dir.path().join("feature_columns.json"), r#"["age", "pdays", "age"]"#)
        .expect("write columns");

    assert!(matches!(
        ModelContext::load(&config),
        Err(ContextError::ArtifactInvalid(_))
    ));
}

#[test]
fn malformed_scaler_is_reported_with_its_kind() {
    let (dir, config) = scratch_artifacts();
    std::fs::write(dir.path().join("scaler.json"), "{\"mean\": [1.0]}").expect("write scaler");

    assert!(matches!(
        ModelContext::load(&config),
        Err(ContextError::ArtifactMalformed {
            kind: ArtifactKind::Scaler,
            ..
        })
    ));
}
