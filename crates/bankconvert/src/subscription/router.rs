use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::CustomerProfile;
use super::service::{PredictionError, PredictionService};
use super::validation::validate;

/// Whether the prediction capability came up at startup.
#[derive(Debug, Clone)]
pub enum PredictionCapability {
    Ready(Arc<PredictionService>),
    Unavailable(String),
}

impl PredictionCapability {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Router exposing model info, profile validation, and scoring.
pub fn subscription_router(capability: PredictionCapability) -> Router {
    Router::new()
        .route("/api/v1/model", get(model_handler))
        .route("/api/v1/profiles/validate", post(validate_handler))
        .route("/api/v1/predictions", post(predict_handler))
        .with_state(capability)
}

fn unavailable(reason: &str) -> Response {
    let payload = json!({
        "error": "prediction capability unavailable",
        "reason": reason,
    });
    (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
}

pub(crate) async fn model_handler(State(capability): State<PredictionCapability>) -> Response {
    match capability {
        PredictionCapability::Ready(service) => {
            let summary = service.context().summary();
            (StatusCode::OK, axum::Json(summary)).into_response()
        }
        PredictionCapability::Unavailable(reason) => unavailable(&reason),
    }
}

pub(crate) async fn validate_handler(axum::Json(profile): axum::Json<CustomerProfile>) -> Response {
    let warnings = validate(&profile);
    let payload = json!({
        "valid": warnings.is_empty(),
        "warnings": warnings,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn predict_handler(
    State(capability): State<PredictionCapability>,
    axum::Json(profile): axum::Json<CustomerProfile>,
) -> Response {
    let service = match capability {
        PredictionCapability::Ready(service) => service,
        PredictionCapability::Unavailable(reason) => return unavailable(&reason),
    };

    match service.predict(&profile) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => {
            warn!(%error, "prediction request rejected");
            let kind = match error {
                PredictionError::InvalidProfile(_) => "invalid_profile",
                PredictionError::Schema(_) => "schema_mismatch",
            };
            let payload = json!({
                "error": error.to_string(),
                "kind": kind,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
