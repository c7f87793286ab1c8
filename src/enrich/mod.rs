//! Content enrichment: web search and page fetching for the drafting model.
//!
//! Enrichment never fails from the caller's point of view. Network and parse
//! errors come back as descriptive text so a draft can still be produced
//! from degraded context.

pub mod detector;
pub mod fetch;
pub mod search;

pub use detector::first_url;
pub use fetch::{ExtractedPage, fetch_page, parse_http_url, truncate_words};
pub use search::{NO_SEARCH_RESULTS, SearchHit, format_hits, parse_results};

use crate::config::EnrichmentConfig;
use crate::llm::{Provider, build_http_client};
use crate::prompt::PromptBuilder;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnrichMode {
    Search,
    Fetch,
}

/// Source of plain-text context for a query.
pub trait Enricher: Send + Sync {
    fn enrich<'a>(
        &'a self,
        query: &'a str,
        mode: EnrichMode,
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>>;
}

/// Secondary generation call that condenses long pages.
pub struct Summarizer {
    provider: Arc<dyn Provider>,
    prompts: Arc<PromptBuilder>,
    model: String,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn Provider>, prompts: Arc<PromptBuilder>, model: &str) -> Self {
        Self {
            provider,
            prompts,
            model: model.to_string(),
        }
    }

    async fn summarize(&self, text: &str, word_cap: usize) -> anyhow::Result<String> {
        let prompt = self.prompts.summary(text, word_cap)?;
        let summary = self.provider.chat(&prompt, &self.model, 0.2).await?;
        let summary = summary.trim();
        if summary.is_empty() {
            anyhow::bail!("summary was empty");
        }
        // Models overshoot word budgets; the cap is a hard limit.
        Ok(truncate_words(summary, word_cap))
    }
}

/// Search + fetch enricher backed by HTTP.
pub struct ContentEnricher {
    client: Client,
    config: EnrichmentConfig,
    summarizer: Option<Summarizer>,
}

impl ContentEnricher {
    pub fn new(config: EnrichmentConfig, summarizer: Option<Summarizer>) -> Self {
        Self {
            client: build_http_client(config.timeout_secs, Some(&config.user_agent)),
            config,
            summarizer,
        }
    }

    async fn run_search(&self, query: &str) -> String {
        match search::search(&self.client, &self.config, query).await {
            Ok(hits) => {
                tracing::info!(query, hits = hits.len(), "web search complete");
                format_hits(&hits)
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "web search failed");
                format!("Web search failed: {e:#}")
            }
        }
    }

    async fn run_fetch(&self, raw_url: &str) -> String {
        let url = match parse_http_url(raw_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(url = raw_url, error = %e, "refusing to fetch");
                return format!("Failed to fetch {raw_url}: {e:#}");
            }
        };

        let page = match fetch_page(&self.client, &url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "page fetch failed");
                return format!("Failed to fetch {url}: {e:#}");
            }
        };

        if page.text.is_empty() {
            return format!("No readable text found at {url}.");
        }

        let body = self.condense(&page.text).await;
        match page.title {
            Some(title) => format!("{title}\n{body}"),
            None => body,
        }
    }

    async fn condense(&self, text: &str) -> String {
        if text.chars().count() <= self.config.summarize_threshold_chars {
            return text.to_string();
        }

        let word_cap = self.config.summary_word_cap;
        let Some(summarizer) = &self.summarizer else {
            return truncate_words(text, word_cap);
        };

        match summarizer.summarize(text, word_cap).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(error = %e, "summary failed; truncating page text instead");
                truncate_words(text, word_cap)
            }
        }
    }
}

impl Enricher for ContentEnricher {
    fn enrich<'a>(
        &'a self,
        query: &'a str,
        mode: EnrichMode,
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>> {
        Box::pin(async move {
            match mode {
                EnrichMode::Search => self.run_search(query).await,
                EnrichMode::Fetch => self.run_fetch(query).await,
            }
        })
    }
}
