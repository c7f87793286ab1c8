// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod http_client;
pub mod scrub;
pub mod traits;
pub mod types;

// ── Provider implementations ────────────────────────────────────────────────
pub mod openai;

// ── Re-exports ──────────────────────────────────────────────────────────────
pub use http_client::{build_http_client, build_provider_client};
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::{Provider, messages_to_text};
pub use types::{ContentBlock, MessageRole, ProviderMessage, ProviderResponse, StopReason};

pub use openai::OpenAiProvider;
