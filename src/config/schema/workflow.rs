use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunStoreKind {
    /// Runs live only as long as the process.
    #[default]
    Memory,
    /// One JSON snapshot per suspended run under `<workspace>/runs`.
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Tool calls the model may make before it must produce a draft
    #[serde(default = "default_max_tool_calls_per_cycle")]
    pub max_tool_calls_per_cycle: u32,
    #[serde(default)]
    pub run_store: RunStoreKind,
}

fn default_max_tool_calls_per_cycle() -> u32 {
    1
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_tool_calls_per_cycle: default_max_tool_calls_per_cycle(),
            run_store: RunStoreKind::default(),
        }
    }
}
