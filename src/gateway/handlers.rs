use crate::error::{PostcraftError, RunError, WorkflowError};
use crate::workflow::StartRequest;
use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::{AppState, FeedbackBody};
use std::future::Future;
use std::sync::Arc;

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

fn workflow_error_response(err: &PostcraftError) -> Response {
    let status = match err {
        PostcraftError::Workflow(WorkflowError::EmptyFeedback | WorkflowError::EmptyTopic) => {
            StatusCode::BAD_REQUEST
        }
        PostcraftError::Run(RunError::NotFound(_)) => StatusCode::NOT_FOUND,
        PostcraftError::Run(RunError::NotAwaitingReview { .. })
        | PostcraftError::Workflow(WorkflowError::InvalidTransition { .. }) => StatusCode::CONFLICT,
        PostcraftError::Workflow(WorkflowError::Generation(_)) | PostcraftError::Llm(_) => {
            StatusCode::BAD_GATEWAY
        }
        PostcraftError::Config(_) | PostcraftError::Run(_) | PostcraftError::Other(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "run request failed");
    }
    error_response(status, err.to_string())
}

/// Run controller work on its own task so a dropped request does not cancel
/// a run halfway through a model call.
async fn detached<T, F>(work: F) -> Result<T, PostcraftError>
where
    F: Future<Output = Result<T, PostcraftError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| PostcraftError::Other(anyhow::anyhow!("run task failed: {e}")))?
}

/// GET /health: always public
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /runs: start a run and return its first draft
pub(super) async fn handle_start(
    State(state): State<AppState>,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Start payload rejected: {e}");
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid JSON body. Expected: {\"topic\": \"...\"}",
            );
        }
    };

    let controller = Arc::clone(&state.controller);
    match detached(async move { controller.start(request).await }).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => workflow_error_response(&e),
    }
}

/// POST /runs/{id}/feedback: resume a suspended run
pub(super) async fn handle_feedback(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
    body: Result<Json<FeedbackBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Feedback payload rejected: {e}");
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid JSON body. Expected: {\"feedback\": \"...\"}",
            );
        }
    };

    let controller = Arc::clone(&state.controller);
    let resumed = detached(async move {
        controller.submit_feedback(&run_id, &body.feedback).await
    });
    match resumed.await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => workflow_error_response(&e),
    }
}

/// POST /runs/{id}/approve: publish the current draft
pub(super) async fn handle_approve(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Response {
    let controller = Arc::clone(&state.controller);
    match detached(async move { controller.approve(&run_id).await }).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => workflow_error_response(&e),
    }
}

/// GET /runs/{id}: snapshot of a suspended run
pub(super) async fn handle_get_run(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Response {
    match state.controller.current(&run_id) {
        Ok(Some(run)) => (StatusCode::OK, Json(run)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("run not found: {run_id}")),
        Err(e) => workflow_error_response(&e),
    }
}

/// GET /runs: suspended runs, oldest first
pub(super) async fn handle_list_runs(State(state): State<AppState>) -> Response {
    match state.controller.list() {
        Ok(runs) => {
            let summaries: Vec<serde_json::Value> = runs
                .iter()
                .map(|run| {
                    serde_json::json!({
                        "run_id": run.run_id,
                        "stage": run.stage,
                        "topic": run.state.topic,
                        "updated_at": run.updated_at,
                    })
                })
                .collect();
            Json(serde_json::json!({ "runs": summaries })).into_response()
        }
        Err(e) => workflow_error_response(&e),
    }
}
