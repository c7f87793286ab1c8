//! Axum-based HTTP control surface for runs, with body limits and timeouts.
//!
//! - Request body size limits (64KB max)
//! - Request timeouts: 30s for reads, longer for calls that drive a run
//! - Loopback bind by default

mod handlers;

use handlers::{
    handle_approve, handle_feedback, handle_get_run, handle_health, handle_list_runs, handle_start,
};

use crate::config::Config;
use crate::llm::http_client::PROVIDER_TIMEOUT_SECS;
use crate::workflow::WorkflowController;
use anyhow::Result;
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB): prevents memory exhaustion
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s): prevents slow-loris attacks
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Timeout for start/feedback/approve. Covers a drafting call, a summary
/// call for fetched text and the regeneration after it.
pub const RUN_TIMEOUT_SECS: u64 = 4 * PROVIDER_TIMEOUT_SECS;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<WorkflowController>,
}

/// Feedback request body
#[derive(Debug, serde::Deserialize)]
pub struct FeedbackBody {
    pub feedback: String,
}

fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

fn timeout(secs: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(secs))
}

pub fn router(state: AppState) -> Router {
    let reads = Router::new()
        .route("/health", get(handle_health))
        .route("/runs", get(handle_list_runs))
        .route("/runs/{id}", get(handle_get_run))
        .layer(timeout(REQUEST_TIMEOUT_SECS));

    let runs = Router::new()
        .route("/runs", post(handle_start))
        .route("/runs/{id}/feedback", post(handle_feedback))
        .route("/runs/{id}/approve", post(handle_approve))
        .layer(timeout(RUN_TIMEOUT_SECS));

    reads
        .merge(runs)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
}

/// Serve the run API until the process is stopped.
pub async fn run_gateway(
    host: &str,
    port: u16,
    config: &Config,
    controller: Arc<WorkflowController>,
) -> Result<()> {
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the run API would be exposed to the network.\n\
             Fix: use --host 127.0.0.1 (default), or set\n\
             [gateway] allow_public_bind = true in config.toml."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_gateway_with_listener(listener, controller).await
}

/// Serve the run API from a pre-bound listener.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    controller: Arc<WorkflowController>,
) -> Result<()> {
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, "gateway listening");
    println!("◆ Listening on http://{local}");
    println!("  POST /runs                 start a run");
    println!("  POST /runs/{{id}}/feedback   revise, approve or exit");
    println!("  POST /runs/{{id}}/approve    publish the current draft");
    println!("  GET  /runs/{{id}}            inspect a suspended run");
    println!("  GET  /health");

    axum::serve(listener, router(AppState { controller })).await?;
    Ok(())
}
