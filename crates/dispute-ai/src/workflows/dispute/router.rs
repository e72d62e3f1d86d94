use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CaseId, DisputeFiling, EscalationStage, ResolutionKind};
use super::scheduler::{CaseRepository, CaseStatusView, EscalationScheduler, SchedulerError};

/// Router builder exposing the scheduler's caller-facing surface.
pub fn dispute_router<R>(scheduler: Arc<EscalationScheduler<R>>) -> Router
where
    R: CaseRepository + 'static,
{
    Router::new()
        .route("/api/v1/disputes", post(open_case_handler::<R>))
        .route("/api/v1/disputes/:case_id", get(status_handler::<R>))
        .route(
            "/api/v1/disputes/:case_id/actions/due",
            get(due_actions_handler::<R>),
        )
        .route(
            "/api/v1/disputes/:case_id/actions/:stage/executed",
            post(mark_executed_handler::<R>),
        )
        .route(
            "/api/v1/disputes/:case_id/responses",
            post(record_response_handler::<R>),
        )
        .route("/api/v1/disputes/:case_id/pause", post(pause_handler::<R>))
        .route("/api/v1/disputes/:case_id/resume", post(resume_handler::<R>))
        .route(
            "/api/v1/disputes/:case_id/resolve",
            post(resolve_handler::<R>),
        )
        .with_state(scheduler)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DueQuery {
    /// Evaluate the due set as of this instant instead of the wall clock.
    pub(crate) as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseRequest {
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) settlement_offered: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PauseRequest {
    pub(crate) reason: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveRequest {
    pub(crate) final_amount: i64,
    pub(crate) resolution: ResolutionKind,
}

fn error_response(error: SchedulerError) -> Response {
    let status = match &error {
        SchedulerError::NotFound(_) | SchedulerError::ActionNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        SchedulerError::InvalidState { .. } => StatusCode::CONFLICT,
        SchedulerError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

async fn open_case_handler<R>(
    State(scheduler): State<Arc<EscalationScheduler<R>>>,
    Json(filing): Json<DisputeFiling>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match scheduler.open_case(filing, Utc::now()) {
        Ok(case) => {
            let view = CaseStatusView::of(&case, Utc::now());
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn status_handler<R>(
    State(scheduler): State<Arc<EscalationScheduler<R>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match scheduler.status(&CaseId(case_id), Utc::now()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn due_actions_handler<R>(
    State(scheduler): State<Arc<EscalationScheduler<R>>>,
    Path(case_id): Path<String>,
    Query(query): Query<DueQuery>,
) -> Response
where
    R: CaseRepository + 'static,
{
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    match scheduler.due_actions(&CaseId(case_id), as_of) {
        Ok(actions) => (StatusCode::OK, Json(actions)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn mark_executed_handler<R>(
    State(scheduler): State<Arc<EscalationScheduler<R>>>,
    Path((case_id, stage)): Path<(String, String)>,
) -> Response
where
    R: CaseRepository + 'static,
{
    let Some(stage) = EscalationStage::parse(&stage) else {
        let payload = json!({ "error": format!("unknown escalation stage '{stage}'") });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    };

    match scheduler.mark_executed(&CaseId(case_id), stage, Utc::now()) {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn record_response_handler<R>(
    State(scheduler): State<Arc<EscalationScheduler<R>>>,
    Path(case_id): Path<String>,
    Json(request): Json<ResponseRequest>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match scheduler.record_response(
        &CaseId(case_id),
        request.content,
        request.settlement_offered,
        Utc::now(),
    ) {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn pause_handler<R>(
    State(scheduler): State<Arc<EscalationScheduler<R>>>,
    Path(case_id): Path<String>,
    Json(request): Json<PauseRequest>,
) -> Response
where
    R: CaseRepository + 'static,
{
    let case_id = CaseId(case_id);
    match scheduler.pause(&case_id, request.reason) {
        Ok(()) => {
            let payload = json!({ "case_id": case_id.0, "status": "paused" });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn resume_handler<R>(
    State(scheduler): State<Arc<EscalationScheduler<R>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
{
    let case_id = CaseId(case_id);
    match scheduler.resume(&case_id) {
        Ok(()) => {
            let payload = json!({ "case_id": case_id.0, "status": "active" });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn resolve_handler<R>(
    State(scheduler): State<Arc<EscalationScheduler<R>>>,
    Path(case_id): Path<String>,
    Json(request): Json<ResolveRequest>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match scheduler.resolve(
        &CaseId(case_id),
        request.final_amount,
        request.resolution,
        Utc::now(),
    ) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}
