//! Storage for runs suspended at the review gate.

pub mod file;
pub mod memory;

pub use file::FileRunStore;
pub use memory::MemoryRunStore;

use crate::config::{Config, RunStoreKind};
use crate::workflow::RunSnapshot;
use anyhow::Result;
use std::sync::Arc;

pub trait RunStore: Send + Sync {
    fn save(&self, run: &RunSnapshot) -> Result<()>;
    fn get(&self, run_id: &str) -> Result<Option<RunSnapshot>>;
    /// Remove and return a run so only one caller can resume it.
    fn take(&self, run_id: &str) -> Result<Option<RunSnapshot>>;
    fn list(&self) -> Result<Vec<RunSnapshot>>;
}

pub fn create_run_store(config: &Config) -> Result<Arc<dyn RunStore>> {
    match config.workflow.run_store {
        RunStoreKind::Memory => Ok(Arc::new(MemoryRunStore::new())),
        RunStoreKind::File => Ok(Arc::new(FileRunStore::new(&config.runs_dir())?)),
    }
}
