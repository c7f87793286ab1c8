use super::state::{HistoryEntry, NO_CONTENT};
use crate::error::{PostcraftError, WorkflowError};
use crate::llm::{Provider, ProviderMessage};
use crate::prompt::{POST_WRITER_SYSTEM_PROMPT, PromptBuilder};
use crate::tools::{ToolCall, enrichment_tools};
use std::sync::Arc;

/// Outcome of one drafting call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Final(String),
    Tool(ToolCall),
}

/// Inputs for one drafting call, borrowed from the run.
#[derive(Debug, Clone, Copy)]
pub struct DraftInput<'a> {
    pub topic: &'a str,
    pub context: &'a str,
    pub feedback: &'a str,
    pub history: &'a [HistoryEntry],
    pub allow_tools: bool,
    pub temperature: f64,
}

/// Wraps the text-generation capability. Holds no per-run state.
pub struct DraftGenerator {
    provider: Arc<dyn Provider>,
    prompts: Arc<PromptBuilder>,
    model: String,
}

impl DraftGenerator {
    pub fn new(provider: Arc<dyn Provider>, prompts: Arc<PromptBuilder>, model: &str) -> Self {
        Self {
            provider,
            prompts,
            model: model.to_string(),
        }
    }

    /// Rewrite the raw request as a clear topic, keeping the raw text if the
    /// model returns nothing.
    pub async fn refine_topic(&self, raw: &str, temperature: f64) -> Result<String, PostcraftError> {
        let prompt = self.prompts.refine_topic(raw)?;
        let refined = self
            .provider
            .chat(&prompt, &self.model, temperature)
            .await
            .map_err(|e| WorkflowError::Generation(format!("{e:#}")))?;

        let refined = refined.trim();
        if refined.is_empty() {
            Ok(raw.trim().to_string())
        } else {
            Ok(refined.to_string())
        }
    }

    pub async fn generate(&self, input: DraftInput<'_>) -> Result<Generation, PostcraftError> {
        let prompt = self
            .prompts
            .post(input.topic, input.context, input.feedback)?;
        let mut messages = history_messages(input.history);
        messages.push(ProviderMessage::user(prompt));

        let tools = if input.allow_tools {
            enrichment_tools()
        } else {
            Vec::new()
        };

        tracing::debug!(
            provider = self.provider.name(),
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "requesting draft"
        );

        let response = self
            .provider
            .chat_with_tools(
                Some(POST_WRITER_SYSTEM_PROMPT),
                &messages,
                &tools,
                &self.model,
                input.temperature,
            )
            .await
            .map_err(|e| WorkflowError::Generation(format!("{e:#}")))?;

        tracing::debug!(
            model = response.model.as_deref().unwrap_or(&self.model),
            tokens = ?response.total_tokens(),
            "draft response received"
        );

        if input.allow_tools
            && let Some((id, name, arguments)) = response.first_tool_use()
        {
            return Ok(Generation::Tool(ToolCall::from_tool_use(
                id, name, arguments,
            )?));
        }

        let text = response.text.trim();
        if text.is_empty() {
            Ok(Generation::Final(NO_CONTENT.to_string()))
        } else {
            Ok(Generation::Final(text.to_string()))
        }
    }
}

/// Replay the run's conversation as chat messages. A tool call goes back as
/// an assistant tool-use turn answered by a tool result with the same id; a
/// prefetched source has no call and is shown to the model as user text.
fn history_messages(history: &[HistoryEntry]) -> Vec<ProviderMessage> {
    history
        .iter()
        .filter_map(|entry| match entry {
            HistoryEntry::User { content, .. } => Some(ProviderMessage::user(content.clone())),
            HistoryEntry::Assistant {
                tool_call: Some(call),
                ..
            } => Some(ProviderMessage::tool_use(
                call.id.clone(),
                call.request.name(),
                call.request.arguments(),
            )),
            HistoryEntry::Assistant { content, .. } if !content.trim().is_empty() => {
                Some(ProviderMessage::assistant(content.clone()))
            }
            HistoryEntry::Assistant { .. } => None,
            HistoryEntry::ToolResult {
                call_id: Some(id),
                content,
                ..
            } => Some(ProviderMessage::tool_result(id.clone(), content.clone())),
            HistoryEntry::ToolResult {
                tool,
                call_id: None,
                content,
                ..
            } => Some(ProviderMessage::user(format!(
                "Result of {tool}:\n{content}"
            ))),
        })
        .collect()
}
