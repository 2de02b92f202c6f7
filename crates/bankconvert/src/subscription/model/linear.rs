use serde::Deserialize;

use super::{Classifier, ModelError};
use crate::subscription::domain::SubscriptionLabel;

/// Weights of a binary linear model. `coef` may be exported flat or as the single-row matrix
/// the fitted estimator stores.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearParams {
    #[serde(deserialize_with = "flatten_coef")]
    pub coef: Vec<f64>,
    #[serde(deserialize_with = "scalar_or_single")]
    pub intercept: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CoefShape {
    Flat(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InterceptShape {
    Scalar(f64),
    Single(Vec<f64>),
}

fn flatten_coef<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    match CoefShape::deserialize(deserializer)? {
        CoefShape::Flat(coef) => Ok(coef),
        CoefShape::Matrix(mut rows) if rows.len() == 1 => Ok(rows.remove(0)),
        CoefShape::Matrix(rows) => Err(serde::de::Error::custom(format!(
            "binary model expects one coefficient row, found {}",
            rows.len()
        ))),
    }
}

fn scalar_or_single<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match InterceptShape::deserialize(deserializer)? {
        InterceptShape::Scalar(value) => Ok(value),
        InterceptShape::Single(values) if values.len() == 1 => Ok(values[0]),
        InterceptShape::Single(values) => Err(serde::de::Error::custom(format!(
            "binary model expects one intercept, found {}",
            values.len()
        ))),
    }
}

impl LinearParams {
    fn validate(self) -> Result<Self, ModelError> {
        if self.coef.is_empty() {
            return Err(ModelError::Invalid("linear model has no coefficients".into()));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|weight| !weight.is_finite()) {
            return Err(ModelError::Invalid("linear model weights must be finite".into()));
        }
        Ok(self)
    }

    fn decision(&self, features: &[f64]) -> f64 {
        self.coef
            .iter()
            .zip(features)
            .map(|(weight, value)| weight * value)
            .sum::<f64>()
            + self.intercept
    }

    fn label(&self, features: &[f64]) -> SubscriptionLabel {
        if self.decision(features) > 0.0 {
            SubscriptionLabel::Likely
        } else {
            SubscriptionLabel::Unlikely
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    params: LinearParams,
}

impl LogisticRegression {
    pub fn new(params: LinearParams) -> Result<Self, ModelError> {
        Ok(Self {
            params: params.validate()?,
        })
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &'static str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.params.coef.len()
    }

    fn predict(&self, features: &[f64]) -> SubscriptionLabel {
        self.params.label(features)
    }

    fn predict_proba(&self, features: &[f64]) -> Option<f64> {
        let decision = self.params.decision(features);
        Some(1.0 / (1.0 + (-decision).exp()))
    }
}

/// Margin classifier; it exposes a decision sign but no calibrated probability.
#[derive(Debug, Clone)]
pub struct LinearSvc {
    params: LinearParams,
}

impl LinearSvc {
    pub fn new(params: LinearParams) -> Result<Self, ModelError> {
        Ok(Self {
            params: params.validate()?,
        })
    }
}

impl Classifier for LinearSvc {
    fn name(&self) -> &'static str {
        "linear_svc"
    }

    fn n_features(&self) -> usize {
        self.params.coef.len()
    }

    fn predict(&self, features: &[f64]) -> SubscriptionLabel {
        self.params.label(features)
    }

    fn predict_proba(&self, _features: &[f64]) -> Option<f64> {
        None
    }

    fn supports_probability(&self) -> bool {
        false
    }
}
