use crate::tools::ToolCall;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Draft text used when the model produced nothing usable.
pub const NO_CONTENT: &str = "No content";

/// One entry in a run's conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum HistoryEntry {
    User {
        content: String,
        at: DateTime<Utc>,
    },
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_call: Option<ToolCall>,
        at: DateTime<Utc>,
    },
    ToolResult {
        tool: String,
        /// Id of the model call this answers; `None` for a prefetched source.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        call_id: Option<String>,
        content: String,
        at: DateTime<Utc>,
    },
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, tool_call: Option<ToolCall>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_call,
            at: Utc::now(),
        }
    }

    pub fn tool_result(
        tool: impl Into<String>,
        call_id: Option<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::ToolResult {
            tool: tool.into(),
            call_id,
            content: content.into(),
            at: Utc::now(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::User { content, .. }
            | Self::Assistant { content, .. }
            | Self::ToolResult { content, .. } => content,
        }
    }
}

/// Mutable record threaded through a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub topic: String,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
    /// Latest enrichment output. Replaced, not appended, on each tool call.
    #[serde(default)]
    pub context_results: String,
    #[serde(default)]
    pub draft_post: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub approved: bool,
}

impl WorkflowState {
    pub fn new(raw_topic: &str) -> Self {
        Self {
            topic: raw_topic.trim().to_string(),
            conversation_history: vec![HistoryEntry::user(raw_topic.trim())],
            ..Self::default()
        }
    }

    /// Replace the draft. A new draft is never approved.
    pub fn set_draft(&mut self, draft: String) {
        self.conversation_history
            .push(HistoryEntry::assistant(draft.clone(), None));
        self.draft_post = draft;
        self.approved = false;
    }

    /// Text to hand to the publisher; empty for the no-content marker.
    pub fn publishable_draft(&self) -> &str {
        let draft = self.draft_post.trim();
        if draft == NO_CONTENT { "" } else { draft }
    }
}

/// Per-run knobs chosen at start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Tool calls allowed per generation cycle
    #[serde(default = "default_max_tool_calls")]
    pub max_tool_calls: u32,
}

fn default_max_tool_calls() -> u32 {
    1
}
