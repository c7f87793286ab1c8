//! Tools the drafting model may call to gather context.
//!
//! The model sees two functions, `web_search` and `fetch_url`. Whatever it
//! asks for is parsed into a [`ToolRequest`] before anything is executed, so
//! the workflow never branches on raw provider payloads.

use crate::enrich::EnrichMode;
use crate::error::LlmError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const WEB_SEARCH: &str = "web_search";
pub const FETCH_URL: &str = "fetch_url";

/// Description of a tool for the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A validated tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolRequest {
    WebSearch { topic: String },
    FetchUrl { url: String },
}

impl ToolRequest {
    /// Parse a provider tool call (`name` + JSON arguments).
    pub fn from_tool_use(name: &str, input: &Value) -> Result<Self, LlmError> {
        let argument = |key: &'static str| {
            input
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .ok_or_else(|| LlmError::MissingToolArgument {
                    name: name.to_string(),
                    argument: key,
                })
        };

        match name {
            WEB_SEARCH => Ok(Self::WebSearch {
                topic: argument("topic")?,
            }),
            FETCH_URL => Ok(Self::FetchUrl {
                url: argument("url")?,
            }),
            other => Err(LlmError::UnknownTool {
                name: other.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::WebSearch { .. } => WEB_SEARCH,
            Self::FetchUrl { .. } => FETCH_URL,
        }
    }

    pub fn mode(&self) -> EnrichMode {
        match self {
            Self::WebSearch { .. } => EnrichMode::Search,
            Self::FetchUrl { .. } => EnrichMode::Fetch,
        }
    }

    /// The search topic or URL.
    pub fn query(&self) -> &str {
        match self {
            Self::WebSearch { topic } => topic,
            Self::FetchUrl { url } => url,
        }
    }

    /// Arguments object as the model sent it.
    pub fn arguments(&self) -> Value {
        match self {
            Self::WebSearch { topic } => json!({ "topic": topic }),
            Self::FetchUrl { url } => json!({ "url": url }),
        }
    }
}

/// A tool request paired with the provider's call id, so its result can be
/// replayed against the call that asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub request: ToolRequest,
}

impl ToolCall {
    pub fn from_tool_use(id: &str, name: &str, input: &Value) -> Result<Self, LlmError> {
        Ok(Self {
            id: id.to_string(),
            request: ToolRequest::from_tool_use(name, input)?,
        })
    }
}

/// Tool specs offered to the model while drafting.
pub fn enrichment_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: WEB_SEARCH.to_string(),
            description: "Search the web for current information about a topic and return \
                          the top results as title/snippet pairs."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "topic": {"type": "string", "description": "What to search for"}
                },
                "required": ["topic"]
            }),
        },
        ToolSpec {
            name: FETCH_URL.to_string(),
            description: "Fetch a web page and return its readable text, summarized when long."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": "Absolute http(s) URL"}
                },
                "required": ["url"]
            }),
        },
    ]
}
