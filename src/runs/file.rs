use super::RunStore;
use crate::workflow::RunSnapshot;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One JSON file per suspended run.
pub struct FileRunStore {
    dir: PathBuf,
    // Serializes take() so two resumes cannot both read the same file.
    guard: Mutex<()>,
}

impl FileRunStore {
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create run directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            guard: Mutex::new(()),
        })
    }

    fn path_for(&self, run_id: &str) -> Result<PathBuf> {
        let valid = !run_id.is_empty()
            && run_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            anyhow::bail!("invalid run id {run_id:?}");
        }
        Ok(self.dir.join(format!("{run_id}.json")))
    }

    fn read(path: &Path) -> Result<Option<RunSnapshot>> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let run = serde_json::from_str(&contents)
                    .with_context(|| format!("Corrupt run file {}", path.display()))?;
                Ok(Some(run))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|error| anyhow::anyhow!("Lock error: {error}"))
    }
}

impl RunStore for FileRunStore {
    fn save(&self, run: &RunSnapshot) -> Result<()> {
        let path = self.path_for(&run.run_id)?;
        let json = serde_json::to_string_pretty(run).context("Failed to serialize run")?;
        let tmp = path.with_extension("json.tmp");

        let _guard = self.lock()?;
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn get(&self, run_id: &str) -> Result<Option<RunSnapshot>> {
        let path = self.path_for(run_id)?;
        let _guard = self.lock()?;
        Self::read(&path)
    }

    fn take(&self, run_id: &str) -> Result<Option<RunSnapshot>> {
        let path = self.path_for(run_id)?;
        let _guard = self.lock()?;
        let run = Self::read(&path)?;
        if run.is_some() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(run)
    }

    fn list(&self) -> Result<Vec<RunSnapshot>> {
        let _guard = self.lock()?;
        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match Self::read(&path) {
                    Ok(Some(run)) => runs.push(run),
                    Ok(None) => {}
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping run file"),
                }
            }
        }
        runs.sort_by(|a, b| (a.created_at, &a.run_id).cmp(&(b.created_at, &b.run_id)));
        Ok(runs)
    }
}
