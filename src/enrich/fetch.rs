use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Elements whose text never counts as page content.
const SKIPPED_TAGS: [&str; 11] = [
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "svg", "template",
    "iframe",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

/// Parse and check that `raw` is an absolute http(s) URL.
pub fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid URL {raw:?}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => anyhow::bail!("unsupported URL scheme {other:?}"),
    }
}

/// Fetch URL content and extract readable text.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<ExtractedPage> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .context("request failed")?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("server returned {status}");
    }

    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("text/html") || ct.contains("xhtml"));

    let body = response.text().await.context("body unreadable")?;

    if is_html {
        Ok(extract_from_html(url.as_str(), &body))
    } else {
        Ok(ExtractedPage {
            url: url.to_string(),
            title: None,
            text: normalize_whitespace(&body),
        })
    }
}

pub(crate) fn extract_from_html(url: &str, html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty());

    let text = ["article", "main", "body"]
        .into_iter()
        .find_map(|selector| visible_text(&document, selector))
        .unwrap_or_default();

    ExtractedPage {
        url: url.to_string(),
        title,
        text,
    }
}

fn visible_text(document: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let element = document.select(&sel).next()?;
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    let text = normalize_whitespace(&parts.join(" "));
    (!text.is_empty()).then_some(text)
}

fn collect_text(element: ElementRef<'_>, parts: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
            Node::Element(el) if !SKIPPED_TAGS.contains(&el.name()) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, parts);
                }
            }
            _ => {}
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` down to at most `max_words` words.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        words.join(" ")
    } else {
        format!("{}...", words[..max_words].join(" "))
    }
}
