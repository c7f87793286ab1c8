#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use postcraft::Config;
use postcraft::config::RunStoreKind;
use postcraft::enrich::{EnrichMode, Enricher};
use postcraft::llm::{Provider, ProviderMessage, ProviderResponse};
use postcraft::prompt::PromptBuilder;
use postcraft::publish::{PublishResult, Publisher};
use postcraft::runs::{FileRunStore, MemoryRunStore, RunStore};
use postcraft::tools::ToolSpec;
use postcraft::workflow::{DraftGenerator, WorkflowController};

/// Drafting replies come from a queue; topic refinement returns `refined`.
pub struct MockProvider {
    refined: String,
    responses: Mutex<VecDeque<anyhow::Result<ProviderResponse>>>,
    seen_prompts: Mutex<Vec<String>>,
    seen_tool_counts: Mutex<Vec<usize>>,
}

impl MockProvider {
    pub fn new(refined: &str, responses: Vec<ProviderResponse>) -> Arc<Self> {
        Arc::new(Self {
            refined: refined.to_string(),
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            seen_prompts: Mutex::new(Vec::new()),
            seen_tool_counts: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, response: ProviderResponse) {
        self.responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(Ok(response));
    }

    pub fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(Err(anyhow::anyhow!(message.to_string())));
    }

    pub fn seen_prompts(&self) -> Vec<String> {
        self.seen_prompts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn seen_tool_counts(&self) -> Vec<usize> {
        self.seen_tool_counts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn chat_with_system<'a>(
        &'a self,
        _system_prompt: Option<&'a str>,
        _message: &'a str,
        _model: &'a str,
        _temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        let refined = self.refined.clone();
        Box::pin(async move { Ok(refined) })
    }

    fn chat_with_tools<'a>(
        &'a self,
        _system_prompt: Option<&'a str>,
        messages: &'a [ProviderMessage],
        tools: &'a [ToolSpec],
        _model: &'a str,
        _temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        self.seen_prompts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(messages.last().map(ProviderMessage::text).unwrap_or_default());
        self.seen_tool_counts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(tools.len());
        let next = self
            .responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(ProviderResponse::text_only("Fallback draft".into())));
        Box::pin(async move { next })
    }
}

pub struct StaticEnricher {
    text: String,
    queries: Mutex<Vec<(String, EnrichMode)>>,
}

impl StaticEnricher {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<(String, EnrichMode)> {
        self.queries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Enricher for StaticEnricher {
    fn enrich<'a>(
        &'a self,
        query: &'a str,
        mode: EnrichMode,
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>> {
        self.queries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((query.to_string(), mode));
        let text = self.text.clone();
        Box::pin(async move { text })
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Publisher for RecordingPublisher {
    fn name(&self) -> &str {
        "recording"
    }

    fn publish<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = PublishResult> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(text.to_string());
        let result = if text.trim().is_empty() {
            PublishResult::failed("post text is empty")
        } else {
            PublishResult::published(201, Some("urn:li:share:100".into()))
        };
        Box::pin(async move { result })
    }
}

pub struct Harness {
    pub provider: Arc<MockProvider>,
    pub enricher: Arc<StaticEnricher>,
    pub publisher: Arc<RecordingPublisher>,
    pub controller: WorkflowController,
}

fn build(
    provider: Arc<MockProvider>,
    enricher: Arc<StaticEnricher>,
    publisher: Arc<RecordingPublisher>,
    store: Arc<dyn RunStore>,
    config: &Config,
) -> Harness {
    let prompts = Arc::new(PromptBuilder::new().expect("prompt templates"));
    let controller = WorkflowController::new(
        DraftGenerator::new(provider.clone(), prompts, config.model()),
        enricher.clone(),
        publisher.clone(),
        store,
        config,
    );
    Harness {
        provider,
        enricher,
        publisher,
        controller,
    }
}

pub fn harness(provider: Arc<MockProvider>, enrichment: &str) -> Harness {
    build(
        provider,
        StaticEnricher::new(enrichment),
        RecordingPublisher::new(),
        Arc::new(MemoryRunStore::new()),
        &Config::default(),
    )
}

pub fn harness_with_cap(provider: Arc<MockProvider>, enrichment: &str, cap: u32) -> Harness {
    let mut config = Config::default();
    config.workflow.max_tool_calls_per_cycle = cap;
    build(
        provider,
        StaticEnricher::new(enrichment),
        RecordingPublisher::new(),
        Arc::new(MemoryRunStore::new()),
        &config,
    )
}

/// Controller over a file store rooted at `dir`, as a fresh process would build it.
pub fn file_harness(provider: Arc<MockProvider>, dir: &Path) -> Harness {
    let mut config = Config::default();
    config.workflow.run_store = RunStoreKind::File;
    let store = Arc::new(FileRunStore::new(dir).expect("run dir"));
    build(
        provider,
        StaticEnricher::new(""),
        RecordingPublisher::new(),
        store,
        &config,
    )
}
