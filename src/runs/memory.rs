use super::RunStore;
use crate::workflow::RunSnapshot;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local run store.
#[derive(Default)]
pub struct MemoryRunStore {
    runs: Mutex<HashMap<String, RunSnapshot>>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_runs(&self) -> Result<MutexGuard<'_, HashMap<String, RunSnapshot>>> {
        self.runs
            .lock()
            .map_err(|error| anyhow::anyhow!("Lock error: {error}"))
    }
}

impl RunStore for MemoryRunStore {
    fn save(&self, run: &RunSnapshot) -> Result<()> {
        self.lock_runs()?.insert(run.run_id.clone(), run.clone());
        Ok(())
    }

    fn get(&self, run_id: &str) -> Result<Option<RunSnapshot>> {
        Ok(self.lock_runs()?.get(run_id).cloned())
    }

    fn take(&self, run_id: &str) -> Result<Option<RunSnapshot>> {
        Ok(self.lock_runs()?.remove(run_id))
    }

    fn list(&self) -> Result<Vec<RunSnapshot>> {
        let mut runs: Vec<RunSnapshot> = self.lock_runs()?.values().cloned().collect();
        runs.sort_by(|a, b| (a.created_at, &a.run_id).cmp(&(b.created_at, &b.run_id)));
        Ok(runs)
    }
}
