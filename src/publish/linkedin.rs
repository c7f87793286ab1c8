use super::{PublishResult, Publisher};
use crate::config::LinkedInConfig;
use crate::error::ConfigError;
use crate::llm::{build_http_client, sanitize_api_error};
use reqwest::Client;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

const RESTLI_PROTOCOL_VERSION: &str = "2.0.0";
const POST_ID_HEADER: &str = "x-restli-id";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostPayload<'a> {
    author: &'a str,
    commentary: &'a str,
    visibility: &'a str,
    distribution: Distribution,
    lifecycle_state: &'static str,
    is_reshare_disabled_by_author: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Distribution {
    feed_distribution: &'static str,
    target_entities: Vec<String>,
    third_party_distribution_channels: Vec<String>,
}

/// Publisher for the LinkedIn `rest/posts` endpoint.
pub struct LinkedInPublisher {
    client: Client,
    config: LinkedInConfig,
}

impl LinkedInPublisher {
    pub fn new(config: &LinkedInConfig) -> Self {
        Self {
            client: build_http_client(config.timeout_secs, None),
            config: config.clone(),
        }
    }

    /// Token and author URN, or the first one missing.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let token = self
            .config
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingCredential("linkedin.access_token"))?;
        let author = self
            .config
            .author_urn
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(ConfigError::MissingCredential("linkedin.author_urn"))?;
        Ok((token, author))
    }

    async fn send(&self, text: &str) -> PublishResult {
        let text = text.trim();
        if text.is_empty() {
            tracing::warn!("refusing to publish an empty post");
            return PublishResult::failed("post text is empty");
        }

        let (token, author) = match self.credentials() {
            Ok(credentials) => credentials,
            Err(e) => {
                tracing::warn!(error = %e, "linkedin credentials missing");
                return PublishResult::failed(e.to_string());
            }
        };

        let payload = PostPayload {
            author,
            commentary: text,
            visibility: &self.config.visibility,
            distribution: Distribution {
                feed_distribution: "MAIN_FEED",
                target_entities: Vec::new(),
                third_party_distribution_channels: Vec::new(),
            },
            lifecycle_state: "PUBLISHED",
            is_reshare_disabled_by_author: false,
        };

        let response = match self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(token)
            .header("X-Restli-Protocol-Version", RESTLI_PROTOCOL_VERSION)
            .header("LinkedIn-Version", &self.config.api_version)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "linkedin request failed");
                return PublishResult::failed(sanitize_api_error(&format!(
                    "request failed: {e}"
                )));
            }
        };

        let status = response.status();
        let header_id = response
            .headers()
            .get(POST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "linkedin rejected post");
            return PublishResult::failed(format!("LinkedIn API returned {status}"))
                .with_status(status.as_u16())
                .with_details(sanitize_api_error(&body));
        }

        let post_id = header_id.or_else(|| {
            serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|value| value.get("id").and_then(|id| id.as_str()).map(str::to_string))
        });

        tracing::info!(status = status.as_u16(), post_id = ?post_id, "post published");
        PublishResult::published(status.as_u16(), post_id)
    }
}

impl Publisher for LinkedInPublisher {
    fn name(&self) -> &str {
        "linkedin"
    }

    fn publish<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = PublishResult> + Send + 'a>> {
        Box::pin(self.send(text))
    }
}
