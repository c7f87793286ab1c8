use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Search endpoint (DuckDuckGo HTML front end by default)
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Maximum title/snippet pairs returned by one search
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
    /// Fetched pages longer than this (in chars) are summarized
    #[serde(default = "default_summarize_threshold_chars")]
    pub summarize_threshold_chars: usize,
    /// Word budget for summaries of long pages
    #[serde(default = "default_summary_word_cap")]
    pub summary_word_cap: usize,
    /// Transport timeout for search and fetch requests
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_search_url() -> String {
    "https://html.duckduckgo.com/html/".into()
}

fn default_max_search_results() -> usize {
    5
}

fn default_summarize_threshold_chars() -> usize {
    4000
}

fn default_summary_word_cap() -> usize {
    300
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; postcraft/0.1)".into()
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            max_search_results: default_max_search_results(),
            summarize_threshold_chars: default_summarize_threshold_chars(),
            summary_word_cap: default_summary_word_cap(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
