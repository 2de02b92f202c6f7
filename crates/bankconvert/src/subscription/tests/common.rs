use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::subscription::context::ModelContext;
use crate::subscription::domain::{
    ContactDay, ContactMethod, ContactMonth, CreditDefault, CustomerProfile, Education,
    HousingLoan, Job, MaritalStatus, PersonalLoan, PreviousOutcome, SubscriptionLabel,
};
use crate::subscription::encoding::{
    dummy_columns, Encoder, FeatureSchema, ScalerParams, StandardScaler, NUMERIC_COLUMNS,
};
use crate::subscription::features::{AgeGroup, ContactRecency, EconomicCondition};
use crate::subscription::model::Classifier;
use crate::subscription::service::PredictionService;
use crate::subscription::thresholds::{ResolvedThresholds, ThresholdSource, FALLBACK_THRESHOLDS};

/// A mid-career customer with no campaign history and nothing contradictory.
pub(super) fn profile() -> CustomerProfile {
    CustomerProfile {
        age: 41,
        job: Job::Technician,
        marital: MaritalStatus::Married,
        education: Education::UniversityDegree,
        default: CreditDefault::No,
        housing: HousingLoan::Yes,
        loan: PersonalLoan::No,
        contact: ContactMethod::Telephone,
        month: ContactMonth::May,
        day_of_week: ContactDay::Wed,
        pdays: 999,
        previous: 0,
        poutcome: PreviousOutcome::Nonexistent,
        emp_var_rate: 1.1,
        cons_price_idx: 93.994,
        cons_conf_idx: -36.4,
        euribor3m: 4.857,
        nr_employed: 5191.0,
    }
}

/// Retired repeat customer whose last campaign succeeded.
pub(super) fn retiree_profile() -> CustomerProfile {
    CustomerProfile {
        age: 70,
        job: Job::Retired,
        housing: HousingLoan::No,
        contact: ContactMethod::Cellular,
        month: ContactMonth::Oct,
        pdays: 5,
        previous: 2,
        poutcome: PreviousOutcome::Success,
        emp_var_rate: -1.8,
        cons_price_idx: 92.893,
        cons_conf_idx: -46.2,
        euribor3m: 1.313,
        nr_employed: 5099.1,
        ..profile()
    }
}

/// Column list of the training frame: numerics, then indicators in categorical order. The
/// training data held no January or February contacts, so those indicators are absent.
pub(super) fn training_columns() -> Vec<String> {
    let mut columns: Vec<String> = NUMERIC_COLUMNS.iter().map(|column| column.to_string()).collect();
    columns.extend(dummy_columns::<Job>());
    columns.extend(dummy_columns::<MaritalStatus>());
    columns.extend(dummy_columns::<Education>());
    columns.extend(dummy_columns::<CreditDefault>());
    columns.extend(dummy_columns::<HousingLoan>());
    columns.extend(dummy_columns::<PersonalLoan>());
    columns.extend(dummy_columns::<ContactMethod>());
    columns.extend(
        dummy_columns::<ContactMonth>()
            .into_iter()
            .filter(|column| column != "month_jan" && column != "month_feb"),
    );
    columns.extend(dummy_columns::<ContactDay>());
    columns.extend(dummy_columns::<PreviousOutcome>());
    columns.extend(dummy_columns::<AgeGroup>());
    columns.extend(dummy_columns::<EconomicCondition>());
    columns.extend(dummy_columns::<ContactRecency>());
    columns
}

pub(super) fn scaler_params() -> ScalerParams {
    ScalerParams {
        feature_names_in: NUMERIC_COLUMNS[..8]
            .iter()
            .map(|column| column.to_string())
            .collect(),
        mean: vec![40.0, 960.0, 0.2, 0.08, 93.57, -40.5, 3.6, 5167.0],
        scale: vec![10.0, 190.0, 0.5, 1.5, 0.5, 4.6, 1.7, 72.0],
    }
}

pub(super) fn encoder() -> Encoder {
    let schema = FeatureSchema::new(training_columns()).expect("valid schema");
    let scaler = StandardScaler::from_params(scaler_params()).expect("valid scaler");
    Encoder::new(schema, scaler)
}

pub(super) fn fallback_thresholds() -> ResolvedThresholds {
    ResolvedThresholds {
        thresholds: FALLBACK_THRESHOLDS,
        source: ThresholdSource::Fallback,
    }
}

/// Classifier returning a fixed answer regardless of input.
#[derive(Debug)]
pub(super) struct FixedClassifier {
    pub(super) label: SubscriptionLabel,
    pub(super) probability: Option<f64>,
    pub(super) n_features: usize,
}

impl Classifier for FixedClassifier {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, _features: &[f64]) -> SubscriptionLabel {
        self.label
    }

    fn predict_proba(&self, _features: &[f64]) -> Option<f64> {
        self.probability
    }

    fn supports_probability(&self) -> bool {
        self.probability.is_some()
    }
}

pub(super) fn build_service(label: SubscriptionLabel, probability: Option<f64>) -> PredictionService {
    let encoder = encoder();
    let classifier = Arc::new(FixedClassifier {
        label,
        probability,
        n_features: encoder.schema().len(),
    });
    let context =
        ModelContext::from_parts(classifier, encoder, fallback_thresholds()).expect("context");
    PredictionService::new(Arc::new(context))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
