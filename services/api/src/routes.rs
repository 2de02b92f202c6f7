use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use bankconvert::subscription::{subscription_router, PredictionCapability};
use serde_json::json;
use std::sync::atomic::Ordering;

pub(crate) fn with_service_routes(capability: PredictionCapability) -> axum::Router {
    subscription_router(capability)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Ready only once the listener is bound and the model context loaded.
pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if !state.readiness.load(Ordering::Acquire) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        );
    }

    match &state.capability {
        PredictionCapability::Ready(service) => {
            let context = service.context();
            (
                StatusCode::OK,
                Json(json!({
                    "status": "ready",
                    "model": context.classifier().name(),
                    "thresholds": context.threshold_source(),
                })),
            )
        }
        PredictionCapability::Unavailable(reason) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "reason": reason })),
        ),
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
