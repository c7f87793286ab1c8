//! Draft → review → publish workflow.

pub mod controller;
pub mod feedback;
pub mod generator;
pub mod machine;
pub mod state;

pub use controller::{FeedbackOutcome, StartOutcome, StartRequest, WorkflowController};
pub use feedback::Feedback;
pub use generator::{DraftGenerator, DraftInput, Generation};
pub use machine::{Effect, Event, Outcome, RunSnapshot, Stage, transition};
pub use state::{HistoryEntry, NO_CONTENT, RunSettings, WorkflowState};

#[cfg(test)]
pub(crate) mod testing;
