use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ReaperNlpError;
use super::Provider;

pub struct Anthropic {
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
    pub api_base: String,
    pub api_version: String,
}

impl Anthropic {
    pub fn from_env(model: String, timeout_secs: u64) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| anyhow!("ANTHROPIC_API_KEY env var is not set"))?;
        Ok(Self {
            model,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            api_base: "https://api.anthropic.com".into(),
            api_version: "2023-06-01".into(),
        })
    }
}

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Msg<'a>>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MsgResponse {
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(default)]
    text: String,
    #[serde(default)]
    r#type: String,
}

fn first_text(body: &str) -> Result<String> {
    let parsed: MsgResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("anthropic response parse error: {}", e))?;
    parsed
        .content
        .into_iter()
        .find(|b| b.r#type == "text" || !b.text.is_empty())
        .map(|b| b.text)
        .ok_or_else(|| ReaperNlpError::Provider("anthropic: empty content".into()).into())
}

#[async_trait]
impl Provider for Anthropic {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        let client = Client::builder().timeout(self.timeout).build()?;
        let body = MsgRequest {
            model: &self.model,
            max_tokens: 4096,
            messages: vec![Msg { role: "user", content: prompt }],
        };

        log::debug!("anthropic: POST {}", url);

        let resp = client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .context("anthropic request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("anthropic read body failed")?;
        log::trace!("anthropic: raw body:\n{}", text);

        if !status.is_success() {
            return Err(ReaperNlpError::Provider(format!("anthropic API error ({}): {}", status, text)).into());
        }
        first_text(&text)
    }
}
