use anyhow::{bail, Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Args, ProviderKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: String,
    pub timeout_secs: u64,
    pub ollama_url: Option<String>,
    pub audio_format: String,
    pub post_process: bool,
    pub python: String,
    pub examples_manifest: Option<String>,
    pub prompt_template: Option<String>,
    pub artifacts_dir: String,
    pub save_artifacts: bool,
    pub auto_approve: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAI,
            model: "gpt-4.1-mini".into(),
            timeout_secs: 600,
            ollama_url: Some("http://localhost:11434".into()),
            audio_format: "mp3".into(),
            post_process: false,
            python: "python3".into(),
            examples_manifest: None,
            prompt_template: None,
            artifacts_dir: ".reaper_nlp".into(),
            save_artifacts: false,
            auto_approve: false,
        }
    }
}

impl Config {
    /// Read a settings file; `.yaml`/`.yml` are parsed as YAML, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let cfg = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?,
            "toml" | "" => toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?,
            other => bail!("unsupported config format .{} ({})", other, path.display()),
        };
        Ok(cfg)
    }

    /// File (if given) overridden by command-line flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(p) => Self::load(Path::new(p))?,
            None => Self::default(),
        };
        if let Some(p) = args.provider { cfg.provider = p; }
        if let Some(m) = &args.model { cfg.model = m.clone(); }
        if let Some(t) = args.timeout_secs { cfg.timeout_secs = t; }
        if let Some(f) = &args.format { cfg.audio_format = f.clone(); }
        if let Some(p) = &args.python { cfg.python = p.clone(); }
        if let Some(m) = &args.examples_manifest { cfg.examples_manifest = Some(m.clone()); }
        if let Some(t) = &args.prompt_template { cfg.prompt_template = Some(t.clone()); }
        cfg.post_process |= args.post_process;
        cfg.save_artifacts |= args.save_artifacts;
        cfg.auto_approve |= args.auto_approve;
        Ok(cfg)
    }
}
