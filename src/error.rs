use crate::workflow::Stage;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `postcraft`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; adapter code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum PostcraftError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Workflow ────────────────────────────────────────────────────────
    #[error("workflow: {0}")]
    Workflow(#[from] WorkflowError),

    // ── Run store ───────────────────────────────────────────────────────
    #[error("run: {0}")]
    Run(#[from] RunError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} returned an empty response")]
    EmptyResponse { provider: String },

    #[error("model requested unknown tool {name}")]
    UnknownTool { name: String },

    #[error("tool {name} called without required argument {argument}")]
    MissingToolArgument { name: String, argument: &'static str },
}

// ─── Workflow errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("event {event} is not valid in stage {stage}")]
    InvalidTransition { stage: Stage, event: &'static str },

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("feedback must not be empty")]
    EmptyFeedback,

    #[error("topic must not be empty")]
    EmptyTopic,
}

// ─── Run store errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RunError {
    #[error("run not found: {0}")]
    NotFound(String),

    #[error("run {run_id} is not awaiting review (stage {stage})")]
    NotAwaitingReview { run_id: String, stage: Stage },

    #[error("store: {0}")]
    Store(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, PostcraftError>;
