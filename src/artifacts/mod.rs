use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::pipeline::Observer;

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join("tx").join(tx.to_string())
}

#[derive(Debug, Serialize)]
pub struct RunRecord {
    pub tx: Uuid,
    pub started_at: DateTime<Utc>,
    pub project: String,
    pub instruction: String,
    pub provider: String,
    pub model: String,
    pub render_path: Option<String>,
}

/// Writes prompt, response and script of one run under `<root>/tx/<id>/`.
pub struct ArtifactWriter {
    dir: PathBuf,
    enabled: bool,
}

impl ArtifactWriter {
    pub fn new(root: &Path, tx: Uuid, enabled: bool) -> Self {
        Self { dir: tx_dir(root, tx), enabled }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn save(&self, name: &str, contents: &str) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;
        let p = self.dir.join(name);
        fs::write(&p, contents)?;
        log::debug!("saved {}", p.display());
        Ok(())
    }

    pub fn save_record(&self, record: &RunRecord) -> anyhow::Result<()> {
        self.save("run.json", &to_string_pretty(record)?)
    }
}

impl Observer for ArtifactWriter {
    fn prompt(&mut self, prompt: &str) -> anyhow::Result<()> {
        self.save("prompt.txt", prompt)
    }

    fn response(&mut self, response: &str) -> anyhow::Result<()> {
        self.save("response.txt", response)
    }

    fn script(&mut self, script: &str) -> anyhow::Result<()> {
        self.save("script.py", script)
    }
}
