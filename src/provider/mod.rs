use anyhow::Result;
use async_trait::async_trait;

use crate::cli::ProviderKind;

pub mod openai;
pub mod anthropic;
pub mod ollama;

/// Anything that maps one prompt to one text reply.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(
    kind: ProviderKind,
    model: String,
    timeout_secs: u64,
    ollama_url: Option<String>,
) -> Result<DynProvider> {
    match kind {
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider::new(model, timeout_secs))),
        ProviderKind::Anthropic => Ok(Box::new(anthropic::Anthropic::from_env(model, timeout_secs)?)),
        ProviderKind::Ollama => Ok(Box::new(ollama::Ollama::new(
            model,
            ollama_url.unwrap_or_else(|| ollama::DEFAULT_URL.to_string()),
            timeout_secs,
        ))),
    }
}
