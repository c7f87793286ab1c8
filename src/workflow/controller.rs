use super::feedback::Feedback;
use super::generator::{DraftGenerator, DraftInput};
use super::machine::{Effect, Event, Outcome, RunSnapshot, Stage, transition};
use super::state::{HistoryEntry, RunSettings};
use crate::config::Config;
use crate::enrich::{EnrichMode, Enricher, first_url};
use crate::error::{PostcraftError, Result, RunError, WorkflowError};
use crate::publish::{PublishResult, Publisher};
use crate::runs::RunStore;
use crate::tools::FETCH_URL;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    pub topic: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartOutcome {
    pub run_id: String,
    pub draft: String,
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedbackOutcome {
    /// A revised draft is waiting for review.
    Draft { run_id: String, draft: String },
    /// Publishing was attempted; `success` tells whether it went through.
    Published { result: PublishResult },
    Ended,
}

/// Where `drive` stopped.
struct Step {
    run: RunSnapshot,
    effect: Effect,
    publish: Option<PublishResult>,
}

pub struct WorkflowController {
    generator: DraftGenerator,
    enricher: Arc<dyn Enricher>,
    publisher: Arc<dyn Publisher>,
    store: Arc<dyn RunStore>,
    default_temperature: f64,
    max_tool_calls: u32,
}

impl WorkflowController {
    pub fn new(
        generator: DraftGenerator,
        enricher: Arc<dyn Enricher>,
        publisher: Arc<dyn Publisher>,
        store: Arc<dyn RunStore>,
        config: &Config,
    ) -> Self {
        Self {
            generator,
            enricher,
            publisher,
            store,
            default_temperature: config.default_temperature,
            max_tool_calls: config.workflow.max_tool_calls_per_cycle,
        }
    }

    /// Refine the topic, draft, and suspend for review.
    pub async fn start(&self, request: StartRequest) -> Result<StartOutcome> {
        let raw_topic = request.topic.trim();
        if raw_topic.is_empty() {
            return Err(WorkflowError::EmptyTopic.into());
        }

        let temperature = request
            .temperature
            .filter(|t| (0.0..=2.0).contains(t))
            .unwrap_or(self.default_temperature);
        let source_url = request
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .or_else(|| first_url(raw_topic).map(|url| url.to_string()));

        let run_id = Uuid::new_v4().to_string();
        let mut logs = Vec::new();
        let mut run = RunSnapshot::new(
            run_id.clone(),
            raw_topic,
            RunSettings {
                temperature,
                source_url: source_url.clone(),
                max_tool_calls: self.max_tool_calls,
            },
        );
        tracing::info!(run_id = %run_id, "run started");

        if let Some(url) = source_url {
            logs.push(format!("Fetching source {url}"));
            let text = self.enricher.enrich(&url, EnrichMode::Fetch).await;
            run.state
                .conversation_history
                .push(HistoryEntry::tool_result(FETCH_URL, None, text.clone()));
            run.state.context_results = text;
        }

        let topic = self.generator.refine_topic(raw_topic, temperature).await?;
        logs.push(format!("Refined topic: {topic}"));
        let (run, effect) = transition(run, Event::TopicRefined(topic))?;

        let step = self.drive(run, effect, &mut logs).await?;
        let draft = self.settle(step)?;
        let draft = match draft {
            FeedbackOutcome::Draft { draft, .. } => draft,
            other => {
                return Err(PostcraftError::Other(anyhow::anyhow!(
                    "run {run_id} finished before review: {other:?}"
                )));
            }
        };

        Ok(StartOutcome {
            run_id,
            draft,
            logs,
        })
    }

    /// Resume a suspended run with reviewer feedback.
    pub async fn submit_feedback(&self, run_id: &str, text: &str) -> Result<FeedbackOutcome> {
        if text.trim().is_empty() {
            return Err(WorkflowError::EmptyFeedback.into());
        }

        let run = self
            .store
            .take(run_id)
            .map_err(store_error)?
            .ok_or_else(|| RunError::NotFound(run_id.to_string()))?;

        if run.stage != Stage::AwaitReview {
            let stage = run.stage;
            self.store.save(&run).map_err(store_error)?;
            return Err(RunError::NotAwaitingReview {
                run_id: run_id.to_string(),
                stage,
            }
            .into());
        }

        tracing::info!(run_id, decision = Feedback::classify(text).label(), "resuming run");
        let mut guard = ResumeGuard {
            store: self.store.as_ref(),
            original: Some(run.clone()),
        };
        let mut logs = Vec::new();
        let resumed = match transition(run, Event::FeedbackSubmitted(text.to_string())) {
            Ok((run, effect)) => self.drive(run, effect, &mut logs).await,
            Err(e) => Err(e.into()),
        };

        match resumed {
            Ok(step) => {
                guard.complete();
                self.settle(step)
            }
            Err(e) => {
                tracing::warn!(run_id, error = %e, "resume failed; restoring snapshot");
                guard.restore().map_err(store_error)?;
                Err(e)
            }
        }
    }

    pub async fn approve(&self, run_id: &str) -> Result<FeedbackOutcome> {
        self.submit_feedback(run_id, "approve").await
    }

    pub fn current(&self, run_id: &str) -> Result<Option<RunSnapshot>> {
        self.store.get(run_id).map_err(store_error)
    }

    pub fn list(&self) -> Result<Vec<RunSnapshot>> {
        self.store.list().map_err(store_error)
    }

    /// Execute effects until the run suspends or finishes.
    async fn drive(
        &self,
        mut run: RunSnapshot,
        mut effect: Effect,
        logs: &mut Vec<String>,
    ) -> Result<Step> {
        let mut publish = None;

        loop {
            let event = match &effect {
                Effect::Generate { allow_tools } => {
                    let generation = self
                        .generator
                        .generate(DraftInput {
                            topic: &run.state.topic,
                            context: &run.state.context_results,
                            feedback: &run.state.feedback,
                            history: &run.state.conversation_history,
                            allow_tools: *allow_tools,
                            temperature: run.settings.temperature,
                        })
                        .await?;
                    Event::Generated(generation)
                }
                Effect::Enrich(call) => {
                    let request = &call.request;
                    tracing::info!(
                        run_id = %run.run_id,
                        tool = request.name(),
                        query = request.query(),
                        "dispatching tool"
                    );
                    logs.push(format!("Calling {} for {}", request.name(), request.query()));
                    let text = self.enricher.enrich(request.query(), request.mode()).await;
                    Event::Enriched {
                        call_id: call.id.clone(),
                        tool: request.name().to_string(),
                        text,
                    }
                }
                Effect::Publish(text) => {
                    logs.push("Publishing approved draft".to_string());
                    let result = self.publisher.publish(text).await;
                    if result.success {
                        tracing::info!(run_id = %run.run_id, post_id = ?result.post_id, "run published");
                    } else {
                        tracing::warn!(run_id = %run.run_id, error = ?result.error, "publish failed");
                    }
                    publish = Some(result.clone());
                    Event::PublishCompleted(result)
                }
                Effect::AwaitReview(_) | Effect::Finish(_) => {
                    return Ok(Step {
                        run,
                        effect,
                        publish,
                    });
                }
            };

            (run, effect) = transition(run, event)?;
        }
    }

    /// Persist a suspended run or report how it finished.
    fn settle(&self, step: Step) -> Result<FeedbackOutcome> {
        let Step {
            run,
            effect,
            publish,
        } = step;

        match effect {
            Effect::AwaitReview(draft) => {
                self.store.save(&run).map_err(store_error)?;
                tracing::info!(run_id = %run.run_id, "awaiting review");
                Ok(FeedbackOutcome::Draft {
                    run_id: run.run_id,
                    draft,
                })
            }
            Effect::Finish(Outcome::Ended) => {
                tracing::info!(run_id = %run.run_id, "run ended");
                Ok(FeedbackOutcome::Ended)
            }
            Effect::Finish(Outcome::Published | Outcome::PublishFailed) => {
                let result = publish.unwrap_or_else(|| PublishResult::failed("publish skipped"));
                Ok(FeedbackOutcome::Published { result })
            }
            Effect::Generate { .. } | Effect::Enrich(_) | Effect::Publish(_) => {
                Err(PostcraftError::Other(anyhow::anyhow!(
                    "run {} stopped mid-cycle in stage {}",
                    run.run_id,
                    run.stage
                )))
            }
        }
    }
}

/// Holds a snapshot taken out of the store for a resume. Unless the resume
/// runs to completion the snapshot goes back, even when the resume future is
/// dropped before it finishes.
struct ResumeGuard<'a> {
    store: &'a dyn RunStore,
    original: Option<RunSnapshot>,
}

impl ResumeGuard<'_> {
    fn complete(&mut self) {
        self.original = None;
    }

    fn restore(&mut self) -> anyhow::Result<()> {
        match self.original.take() {
            Some(run) => self.store.save(&run),
            None => Ok(()),
        }
    }
}

impl Drop for ResumeGuard<'_> {
    fn drop(&mut self) {
        if let Some(run) = self.original.take() {
            tracing::warn!(run_id = %run.run_id, "resume interrupted; restoring snapshot");
            if let Err(e) = self.store.save(&run) {
                tracing::error!(run_id = %run.run_id, error = %e, "failed to restore snapshot");
            }
        }
    }
}

fn store_error(e: anyhow::Error) -> PostcraftError {
    RunError::Store(format!("{e:#}")).into()
}
