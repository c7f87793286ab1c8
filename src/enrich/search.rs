use crate::config::EnrichmentConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

pub const NO_SEARCH_RESULTS: &str = "No search results found.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: Option<String>,
}

/// Run a query against the DuckDuckGo HTML front end.
pub async fn search(
    client: &Client,
    config: &EnrichmentConfig,
    query: &str,
) -> Result<Vec<SearchHit>> {
    let response = client
        .get(&config.search_url)
        .query(&[("q", query)])
        .send()
        .await
        .context("search request failed")?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("search provider returned {status}");
    }

    let body = response
        .text()
        .await
        .context("search response body unreadable")?;
    Ok(parse_results(&body, config.max_search_results))
}

fn element_text(element: ElementRef<'_>) -> String {
    let joined = element.text().collect::<Vec<_>>().join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract up to `max` organic results from a search results page.
pub fn parse_results(html: &str, max: usize) -> Vec<SearchHit> {
    let (Ok(result_sel), Ok(title_sel), Ok(snippet_sel)) = (
        Selector::parse("div.result"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);

    document
        .select(&result_sel)
        .filter(|result| {
            !result
                .value()
                .classes()
                .any(|class| class == "result--ad")
        })
        .filter_map(|result| {
            let title_el = result.select(&title_sel).next()?;
            let title = element_text(title_el);
            if title.is_empty() {
                return None;
            }
            let snippet = result
                .select(&snippet_sel)
                .next()
                .map(element_text)
                .unwrap_or_default();
            let url = title_el.value().attr("href").map(str::to_string);
            Some(SearchHit {
                title,
                snippet,
                url,
            })
        })
        .take(max)
        .collect()
}

/// Render hits as numbered title/snippet pairs, or the no-results sentinel.
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return NO_SEARCH_RESULTS.to_string();
    }

    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("{}. {}\n{}", i + 1, hit.title, hit.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}
