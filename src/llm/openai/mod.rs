mod types;

use self::types::{
    ChatRequest, ChatResponse, Message, OpenAiTool, OpenAiToolCall, OpenAiToolCallFunction,
    OpenAiToolDefinition,
};
use crate::llm::types::{
    ContentBlock, MessageRole, ProviderMessage, ProviderResponse, StopReason,
};
use crate::llm::{Provider, api_error, build_provider_client, scrub_secret_patterns};
use crate::tools::ToolSpec;
use anyhow::Context;
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

const PROVIDER_NAME: &str = "OpenAI";

/// OpenAI-compatible chat-completions provider with function calling.
pub struct OpenAiProvider {
    base_url: String,
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cached_auth_header: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(|k| format!("Bearer {k}")),
            client: build_provider_client(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn text_message(role: &'static str, content: String) -> Message {
        Message {
            role,
            content: Some(content),
            tool_call_id: None,
            tool_calls: None,
        }
    }

    fn map_provider_message(provider_message: &ProviderMessage) -> Vec<Message> {
        let mut text_parts = Vec::new();
        let mut tool_calls = Vec::new();
        let mut tool_messages = Vec::new();

        for block in &provider_message.content {
            match block {
                ContentBlock::Text { text } => text_parts.push(text.clone()),
                ContentBlock::ToolUse { id, name, input } => tool_calls.push(OpenAiToolCall {
                    id: id.clone(),
                    r#type: "function".to_string(),
                    function: OpenAiToolCallFunction {
                        name: name.clone(),
                        arguments: input.to_string(),
                    },
                }),
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                } => tool_messages.push(Message {
                    role: "tool",
                    content: Some(content.clone()),
                    tool_call_id: Some(tool_use_id.clone()),
                    tool_calls: None,
                }),
            }
        }

        let text = (!text_parts.is_empty()).then(|| text_parts.join("\n"));
        let mut messages = Vec::new();

        match provider_message.role {
            MessageRole::Assistant => {
                if text.is_some() || !tool_calls.is_empty() {
                    messages.push(Message {
                        role: "assistant",
                        content: text,
                        tool_call_id: None,
                        tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
                    });
                }
            }
            MessageRole::User => {
                if let Some(text) = text {
                    messages.push(Self::text_message("user", text));
                }
            }
            MessageRole::System => {
                if let Some(text) = text {
                    messages.push(Self::text_message("system", text));
                }
            }
        }

        messages.extend(tool_messages);
        messages
    }

    fn build_tools(tools: &[ToolSpec]) -> Option<Vec<OpenAiTool>> {
        if tools.is_empty() {
            return None;
        }
        Some(
            tools
                .iter()
                .map(|tool| OpenAiTool {
                    r#type: "function",
                    function: OpenAiToolDefinition {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: tool.parameters.clone(),
                    },
                })
                .collect(),
        )
    }

    fn build_request(
        system_prompt: Option<&str>,
        messages: &[ProviderMessage],
        tools: &[ToolSpec],
        model: &str,
        temperature: f64,
    ) -> ChatRequest {
        let mut openai_messages = Vec::with_capacity(messages.len() + 1);

        if let Some(sys) = system_prompt {
            openai_messages.push(Self::text_message("system", sys.to_string()));
        }

        for provider_message in messages {
            openai_messages.extend(Self::map_provider_message(provider_message));
        }

        ChatRequest {
            model: model.to_string(),
            messages: openai_messages,
            temperature,
            tools: Self::build_tools(tools),
        }
    }

    fn map_finish_reason(finish_reason: Option<&str>) -> StopReason {
        match finish_reason {
            Some("stop") => StopReason::EndTurn,
            Some("tool_calls") => StopReason::ToolUse,
            Some("length") => StopReason::MaxTokens,
            Some(_) | None => StopReason::Error,
        }
    }

    fn parse_tool_calls(tool_calls: Vec<OpenAiToolCall>) -> anyhow::Result<Vec<ContentBlock>> {
        tool_calls
            .into_iter()
            .map(|tool_call| {
                let input: Value = serde_json::from_str(&tool_call.function.arguments)
                    .with_context(|| {
                        format!(
                            "OpenAI tool call arguments were not valid JSON for {}",
                            tool_call.function.name
                        )
                    })?;
                Ok(ContentBlock::ToolUse {
                    id: tool_call.id,
                    name: tool_call.function.name,
                    input,
                })
            })
            .collect()
    }

    fn into_provider_response(chat_response: ChatResponse) -> anyhow::Result<ProviderResponse> {
        let ChatResponse {
            choices,
            usage,
            model,
        } = chat_response;

        let choice = choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No response from {PROVIDER_NAME}"))?;

        let text = choice.message.content.unwrap_or_default();
        let mut content_blocks = Vec::new();
        if !text.is_empty() {
            content_blocks.push(ContentBlock::Text { text: text.clone() });
        }
        content_blocks.extend(Self::parse_tool_calls(
            choice.message.tool_calls.unwrap_or_default(),
        )?);

        let mut response = match usage {
            Some(usage) => {
                ProviderResponse::with_usage(text, usage.prompt_tokens, usage.completion_tokens)
            }
            None => ProviderResponse::text_only(text),
        };
        response.content_blocks = content_blocks;
        response.stop_reason = Some(Self::map_finish_reason(choice.finish_reason.as_deref()));
        if let Some(model) = model {
            response = response.with_model(model);
        }
        Ok(response)
    }

    async fn call_api(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse> {
        let auth_header = self.cached_auth_header.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "OpenAI API key not set. Set POSTCRAFT_API_KEY / OPENAI_API_KEY or edit config.toml."
            )
        })?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", auth_header)
            .json(request)
            .send()
            .await
            .map_err(|error| {
                anyhow::anyhow!(
                    "{PROVIDER_NAME} request failed: {}",
                    scrub_secret_patterns(&error.to_string())
                )
            })?;

        if !response.status().is_success() {
            return Err(api_error(PROVIDER_NAME, response).await);
        }

        response
            .json()
            .await
            .context("OpenAI response JSON decode failed")
    }
}

impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn chat_with_system<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        message: &'a str,
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let messages = [ProviderMessage::user(message)];
            let request = Self::build_request(system_prompt, &messages, &[], model, temperature);
            let response = Self::into_provider_response(self.call_api(&request).await?)?;
            Ok(response.text)
        })
    }

    fn chat_with_tools<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        messages: &'a [ProviderMessage],
        tools: &'a [ToolSpec],
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        Box::pin(async move {
            let request = Self::build_request(system_prompt, messages, tools, model, temperature);
            Self::into_provider_response(self.call_api(&request).await?)
        })
    }
}
