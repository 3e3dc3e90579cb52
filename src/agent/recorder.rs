//! Persists one run to disk: per-step screenshots plus a final
//! `result.json` report.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::agent::state::TaskResult;
use crate::errors::WebPilotResult;

pub struct RunRecorder {
    run_id: String,
    dir: PathBuf,
}

/// Shape of `result.json`. The task outcome fields sit at the top level
/// next to the run metadata.
#[derive(Serialize)]
struct RunReport<'a> {
    run_id: &'a str,
    site: &'a str,
    url: &'a str,
    task: &'a str,
    finished_at: String,
    #[serde(flatten)]
    outcome: &'a TaskResult,
}

impl RunRecorder {
    /// Creates `<base>/<uuid>/` for this run.
    pub fn create(base: &Path) -> WebPilotResult<Self> {
        let run_id = Uuid::new_v4().to_string();
        let dir = base.join(&run_id);
        fs::create_dir_all(&dir)?;
        tracing::info!(run_id = %run_id, dir = %dir.display(), "run directory created");
        Ok(Self { run_id, dir })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the raw PNG bytes for one step, named `step_NN.png`.
    pub fn save_screenshot(&self, step: usize, png: &[u8]) -> WebPilotResult<()> {
        let path = self.dir.join(format!("step_{step:02}.png"));
        fs::write(&path, png)?;
        tracing::debug!(path = %path.display(), "screenshot saved");
        Ok(())
    }

    pub fn save_result(
        &self,
        site: &str,
        url: &str,
        task: &str,
        outcome: &TaskResult,
    ) -> WebPilotResult<PathBuf> {
        let report = RunReport {
            run_id: &self.run_id,
            site,
            url,
            task,
            finished_at: Utc::now().to_rfc3339(),
            outcome,
        };
        let path = self.dir.join("result.json");
        fs::write(&path, serde_json::to_vec_pretty(&report)?)?;
        tracing::info!(path = %path.display(), "result written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_a_fresh_directory_per_run() {
        let base = tempfile::tempdir().unwrap();
        let a = RunRecorder::create(base.path()).unwrap();
        let b = RunRecorder::create(base.path()).unwrap();
        assert_ne!(a.run_id(), b.run_id());
        assert!(a.dir().is_dir());
        assert!(b.dir().is_dir());
    }

    #[test]
    fn screenshots_are_zero_padded_by_step() {
        let base = tempfile::tempdir().unwrap();
        let rec = RunRecorder::create(base.path()).unwrap();
        rec.save_screenshot(3, b"png-bytes").unwrap();
        rec.save_screenshot(12, b"png-bytes").unwrap();
        assert!(rec.dir().join("step_03.png").exists());
        assert!(rec.dir().join("step_12.png").exists());
    }

    #[test]
    fn result_json_carries_metadata_and_outcome() {
        let base = tempfile::tempdir().unwrap();
        let rec = RunRecorder::create(base.path()).unwrap();
        let outcome = TaskResult::failed("Max steps (15) exceeded", 15, Vec::new());
        let path = rec
            .save_result("wikipedia", "https://www.wikipedia.org", "find rust", &outcome)
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["run_id"], rec.run_id());
        assert_eq!(value["site"], "wikipedia");
        assert_eq!(value["task"], "find rust");
        assert_eq!(value["success"], false);
        assert_eq!(value["steps"], 15);
        assert_eq!(value["error"], "Max steps (15) exceeded");
        assert!(value["finished_at"].is_string());
    }
}
