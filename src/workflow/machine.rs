//! Run stages and the pure transition function that moves between them.
//!
//! The controller performs side effects (model calls, enrichment, publishing)
//! and feeds their results back in as [`Event`]s. `transition` decides what
//! happens next and never does I/O itself, so every path through a run can be
//! exercised without a network.

use super::feedback::Feedback;
use super::generator::Generation;
use super::state::{HistoryEntry, NO_CONTENT, RunSettings, WorkflowState};
use crate::error::WorkflowError;
use crate::publish::PublishResult;
use crate::tools::ToolCall;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    RefineTopic,
    Generate,
    Enrich,
    AwaitReview,
    Publish,
    Published,
    Ended,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Published | Self::Ended)
    }
}

/// How a run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Published,
    PublishFailed,
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TopicRefined(String),
    Generated(Generation),
    Enriched {
        call_id: String,
        tool: String,
        text: String,
    },
    FeedbackSubmitted(String),
    PublishCompleted(PublishResult),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TopicRefined(_) => "topic_refined",
            Self::Generated(_) => "generated",
            Self::Enriched { .. } => "enriched",
            Self::FeedbackSubmitted(_) => "feedback_submitted",
            Self::PublishCompleted(_) => "publish_completed",
        }
    }
}

/// Work the controller must do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Generate { allow_tools: bool },
    Enrich(ToolCall),
    AwaitReview(String),
    Publish(String),
    Finish(Outcome),
}

/// Everything needed to resume a run after the review suspension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub run_id: String,
    pub stage: Stage,
    pub state: WorkflowState,
    #[serde(default)]
    pub tool_calls_this_cycle: u32,
    pub settings: RunSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RunSnapshot {
    pub fn new(run_id: impl Into<String>, raw_topic: &str, settings: RunSettings) -> Self {
        let now = Utc::now();
        Self {
            run_id: run_id.into(),
            stage: Stage::RefineTopic,
            state: WorkflowState::new(raw_topic),
            tool_calls_this_cycle: 0,
            settings,
            created_at: now,
            updated_at: now,
        }
    }

    fn tools_left(&self) -> bool {
        self.tool_calls_this_cycle < self.settings.max_tool_calls
    }

    fn enter(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self.updated_at = Utc::now();
        self
    }
}

pub fn transition(
    mut run: RunSnapshot,
    event: Event,
) -> Result<(RunSnapshot, Effect), WorkflowError> {
    match (run.stage, event) {
        (Stage::RefineTopic, Event::TopicRefined(topic)) => {
            let topic = topic.trim();
            if !topic.is_empty() {
                run.state.topic = topic.to_string();
            }
            run.tool_calls_this_cycle = 0;
            let allow_tools = run.tools_left();
            Ok((run.enter(Stage::Generate), Effect::Generate { allow_tools }))
        }

        (Stage::Generate, Event::Generated(Generation::Final(content))) => {
            run.state.set_draft(content.clone());
            Ok((run.enter(Stage::AwaitReview), Effect::AwaitReview(content)))
        }

        (Stage::Generate, Event::Generated(Generation::Tool(call))) => {
            if run.tools_left() {
                run.tool_calls_this_cycle += 1;
                run.state
                    .conversation_history
                    .push(HistoryEntry::assistant("", Some(call.clone())));
                Ok((run.enter(Stage::Enrich), Effect::Enrich(call)))
            } else {
                run.state.set_draft(NO_CONTENT.to_string());
                Ok((
                    run.enter(Stage::AwaitReview),
                    Effect::AwaitReview(NO_CONTENT.to_string()),
                ))
            }
        }

        (
            Stage::Enrich,
            Event::Enriched {
                call_id,
                tool,
                text,
            },
        ) => {
            run.state
                .conversation_history
                .push(HistoryEntry::tool_result(tool, Some(call_id), text.clone()));
            run.state.context_results = text;
            let allow_tools = run.tools_left();
            Ok((run.enter(Stage::Generate), Effect::Generate { allow_tools }))
        }

        (Stage::AwaitReview, Event::FeedbackSubmitted(text)) => {
            run.state
                .conversation_history
                .push(HistoryEntry::user(text.clone()));
            let decision = Feedback::classify(&text);
            run.state.feedback = text;

            match decision {
                Feedback::Approve => {
                    run.state.approved = true;
                    let draft = run.state.publishable_draft().to_string();
                    Ok((run.enter(Stage::Publish), Effect::Publish(draft)))
                }
                Feedback::Exit => Ok((run.enter(Stage::Ended), Effect::Finish(Outcome::Ended))),
                Feedback::Revise(_) => {
                    run.state.approved = false;
                    run.tool_calls_this_cycle = 0;
                    let allow_tools = run.tools_left();
                    Ok((run.enter(Stage::Generate), Effect::Generate { allow_tools }))
                }
            }
        }

        (Stage::Publish, Event::PublishCompleted(result)) => {
            if result.success {
                Ok((
                    run.enter(Stage::Published),
                    Effect::Finish(Outcome::Published),
                ))
            } else {
                Ok((
                    run.enter(Stage::Ended),
                    Effect::Finish(Outcome::PublishFailed),
                ))
            }
        }

        (stage, event) => Err(WorkflowError::InvalidTransition {
            stage,
            event: event.name(),
        }),
    }
}
