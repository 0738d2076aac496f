//! OpenAI-compatible chat completion client.

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::completion::CompletionService;
use crate::http::{api_error, build_service_client};

/// Chat client for OpenAI and API-compatible servers.
pub struct OpenAiCompletion {
    client: reqwest::Client,
    base_url: String,
    /// Pre-formatted `Bearer` value, absent when no key is configured.
    auth_header: Option<String>,
}

impl OpenAiCompletion {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: build_service_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: api_key
                .filter(|k| !k.is_empty())
                .map(|k| format!("Bearer {k}")),
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionService for OpenAiCompletion {
    async fn complete(
        &self,
        system_prompt: Option<&str>,
        prompt: &str,
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        let auth = self
            .auth_header
            .as_deref()
            .context("OpenAI API key not set. Set OPENAI_API_KEY or edit locomo-bench.toml.")?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage { role: "system", content: system });
        }
        messages.push(ChatMessage { role: "user", content: prompt });

        let request = ChatRequest { model, messages, temperature };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", auth)
            .json(&request)
            .send()
            .await
            .context("completion request failed")?;

        if !response.status().is_success() {
            return Err(api_error("OpenAI", response).await);
        }

        let body: ChatResponse = response
            .json()
            .await
            .context("failed to decode completion response")?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
