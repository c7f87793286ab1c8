//! In-process fakes for driving the controller in unit tests.

use super::controller::WorkflowController;
use super::generator::DraftGenerator;
use crate::config::Config;
use crate::enrich::{EnrichMode, Enricher};
use crate::llm::{Provider, ProviderMessage, ProviderResponse};
use crate::prompt::PromptBuilder;
use crate::publish::{PublishResult, Publisher};
use crate::runs::MemoryRunStore;
use crate::tools::ToolSpec;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

enum Reply {
    Ready(anyhow::Result<ProviderResponse>),
    Hang,
}

/// Replies to drafting calls from a queue; refinement echoes a fixed topic.
pub struct ScriptedProvider {
    refined_topic: String,
    replies: Mutex<VecDeque<Reply>>,
    pub prompts: Mutex<Vec<String>>,
    pub tool_offers: Mutex<Vec<usize>>,
}

impl ScriptedProvider {
    pub fn new(refined_topic: &str) -> Arc<Self> {
        Arc::new(Self {
            refined_topic: refined_topic.to_string(),
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            tool_offers: Mutex::new(Vec::new()),
        })
    }

    pub fn reply(&self, response: ProviderResponse) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Ok(response)));
        self
    }

    pub fn reply_text(&self, text: &str) -> &Self {
        self.reply(ProviderResponse::text_only(text.to_string()))
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Err(anyhow::anyhow!(message.to_string()))));
        self
    }

    /// Next drafting call never completes.
    pub fn hang(&self) -> &Self {
        self.replies.lock().unwrap().push_back(Reply::Hang);
        self
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn draft_calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn chat_with_system<'a>(
        &'a self,
        _system_prompt: Option<&'a str>,
        _message: &'a str,
        _model: &'a str,
        _temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        let topic = self.refined_topic.clone();
        Box::pin(async move { Ok(topic) })
    }

    fn chat_with_tools<'a>(
        &'a self,
        _system_prompt: Option<&'a str>,
        messages: &'a [ProviderMessage],
        tools: &'a [ToolSpec],
        _model: &'a str,
        _temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        let prompt = messages.last().map(ProviderMessage::text).unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);
        self.tool_offers.lock().unwrap().push(tools.len());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Ready(reply)) => Box::pin(async move { reply }),
            Some(Reply::Hang) => Box::pin(std::future::pending()),
            None => Box::pin(async {
                Ok(ProviderResponse::text_only("Default draft".into()))
            }),
        }
    }
}

/// Returns canned text and records each query.
pub struct FakeEnricher {
    text: String,
    pub queries: Mutex<Vec<(String, EnrichMode)>>,
}

impl FakeEnricher {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            queries: Mutex::new(Vec::new()),
        })
    }
}

impl Enricher for FakeEnricher {
    fn enrich<'a>(
        &'a self,
        query: &'a str,
        mode: EnrichMode,
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>> {
        self.queries.lock().unwrap().push((query.to_string(), mode));
        let text = self.text.clone();
        Box::pin(async move { text })
    }
}

/// Records publish calls. Empty text fails the way the real publisher does.
pub struct CountingPublisher {
    pub sent: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
    succeed: bool,
}

impl CountingPublisher {
    pub fn new(succeed: bool) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            succeed,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Publisher for CountingPublisher {
    fn name(&self) -> &str {
        "counting"
    }

    fn publish<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = PublishResult> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = if text.trim().is_empty() {
            PublishResult::failed("post text is empty")
        } else {
            self.sent.lock().unwrap().push(text.to_string());
            if self.succeed {
                PublishResult::published(201, Some("urn:li:share:1".into()))
            } else {
                PublishResult::failed("LinkedIn API returned 401 Unauthorized").with_status(401)
            }
        };
        Box::pin(async move { result })
    }
}

pub fn controller(
    provider: Arc<ScriptedProvider>,
    enricher: Arc<FakeEnricher>,
    publisher: Arc<CountingPublisher>,
) -> WorkflowController {
    let prompts = Arc::new(PromptBuilder::new().unwrap());
    WorkflowController::new(
        DraftGenerator::new(provider, prompts, "gpt-4o"),
        enricher,
        publisher,
        Arc::new(MemoryRunStore::new()),
        &Config::default(),
    )
}
