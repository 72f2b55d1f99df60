use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ReaperNlpError;
use super::Provider;

pub const DEFAULT_URL: &str = "http://localhost:11434";

pub struct Ollama {
    pub model: String,
    pub url: String,
    pub timeout: Duration,
}

impl Ollama {
    pub fn new(model: String, url: String, timeout_secs: u64) -> Self {
        Self { model, url, timeout: Duration::from_secs(timeout_secs) }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

/// Message content of a chat response, or the body itself when it is not one.
fn message_content(body: String) -> String {
    match serde_json::from_str::<ChatResponse>(&body) {
        Ok(c) => c.message.content,
        Err(_) => body,
    }
}

#[async_trait]
impl Provider for Ollama {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let client = Client::builder().timeout(self.timeout).build()?;
        let body = ChatRequest {
            model: &self.model,
            messages: vec![Msg { role: "user", content: prompt }],
            stream: false,
            options: OllamaOptions { temperature: 0.1 },
        };

        log::debug!("ollama: POST {}", url);

        let resp = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("ollama request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("ollama read body failed")?;
        log::trace!("ollama: raw body:\n{}", text);

        if !status.is_success() {
            return Err(ReaperNlpError::Provider(format!("ollama error ({}): {}", status, text)).into());
        }
        Ok(message_content(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_chat_message() {
        let raw = r#"{"model":"llama3","message":{"role":"assistant","content":"RPR.Undo_OnStateChange('x')"},"done":true}"#;
        assert_eq!(message_content(raw.to_string()), "RPR.Undo_OnStateChange('x')");
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(message_content("plain".to_string()), "plain");
    }
}
