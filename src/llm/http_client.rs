use reqwest::Client;
use std::time::Duration;

/// Per-request timeout for chat-completion calls.
pub const PROVIDER_TIMEOUT_SECS: u64 = 120;

/// Client for chat-completion calls; generations can take a while.
pub fn build_provider_client() -> Client {
    build_http_client(PROVIDER_TIMEOUT_SECS, None)
}

/// Shared builder for every outbound HTTP call the crate makes.
pub fn build_http_client(timeout_secs: u64, user_agent: Option<&str>) -> Client {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(reqwest::redirect::Policy::limited(5))
        .pool_idle_timeout(Duration::from_secs(90));

    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent.to_string());
    }

    builder.build().unwrap_or_else(|_| Client::new())
}
