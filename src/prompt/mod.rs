mod builder;
mod engine;

pub use builder::{
    NO_CONTEXT_PLACEHOLDER, NO_FEEDBACK_PLACEHOLDER, POST_WRITER_SYSTEM_PROMPT, PromptBuilder,
};
pub use engine::TeraEngine;
