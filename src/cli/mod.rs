use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "open-ai", alias = "openai")]
    OpenAI,
    #[value(alias = "anthropic")]
    Anthropic,
    #[value(alias = "ollama")]
    Ollama,
}

#[derive(Parser, Debug)]
#[command(name = "reaper_nlp", version, about = "Edit a REAPER project from a natural-language instruction and render it")]
pub struct Args {
    /// The .RPP project to edit.
    #[arg(long)]
    pub project: String,

    /// What to do to the project, in plain words.
    #[arg(long)]
    pub instruction: String,

    /// Where to render; defaults to the project path with the format's extension.
    #[arg(long)]
    pub render_path: Option<String>,

    #[arg(long)]
    pub format: Option<String>,

    /// Run only the first ```python block of the model's answer.
    #[arg(long, default_value_t = false)]
    pub post_process: bool,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// TOML file with `[[example]]` entries replacing the built-in examples.
    #[arg(long)]
    pub examples_manifest: Option<String>,

    #[arg(long)]
    pub prompt_template: Option<String>,

    #[arg(long)]
    pub python: Option<String>,

    /// TOML or YAML settings file.
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, default_value_t = false)]
    pub auto_approve: bool,

    #[arg(long, default_value_t = false)]
    pub save_artifacts: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
