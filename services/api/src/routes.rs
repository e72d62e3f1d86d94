use crate::infra::{AnalysisContext, AppState, StaticDirectoryLookup};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use dispute_ai::workflows::dispute::{
    dispute_router, CaseRepository, DisputeAnalysis, EscalationScheduler,
};

#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisRequest {
    pub(crate) counterparty: String,
    pub(crate) jurisdiction: String,
    pub(crate) item: String,
    pub(crate) billed_amount: i64,
    /// Overrides the directory's reference rate when supplied.
    #[serde(default)]
    pub(crate) reference_amount: Option<i64>,
    #[serde(default)]
    pub(crate) declared_annual_income: Option<i64>,
}

pub(crate) fn with_dispute_routes<R>(scheduler: Arc<EscalationScheduler<R>>) -> axum::Router
where
    R: CaseRepository + 'static,
{
    dispute_router(scheduler)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/disputes/analysis",
            axum::routing::post(analysis_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn analysis_endpoint(
    Extension(context): Extension<AnalysisContext>,
    Json(request): Json<AnalysisRequest>,
) -> impl IntoResponse {
    let reference = match request.reference_amount {
        Some(reference) => Some(reference),
        None => match context
            .lookup
            .reference_rate(&request.item, &request.jurisdiction)
        {
            Ok(reference) => reference,
            Err(error) => {
                let payload = json!({ "error": error.to_string() });
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
            }
        },
    };

    let Some(reference) = reference else {
        let payload = json!({
            "error": format!(
                "no reference rate on record for '{}' in {}",
                request.item, request.jurisdiction
            ),
        });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    let profile = match context
        .lookup
        .counterparty_profile(&request.counterparty, &request.jurisdiction)
    {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            StaticDirectoryLookup::fallback_profile(&request.counterparty, &request.jurisdiction)
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    let analysis = DisputeAnalysis::build(
        request.billed_amount,
        reference,
        &profile,
        request.declared_annual_income,
        &context.leverage,
    );

    (StatusCode::OK, Json(analysis)).into_response()
}
