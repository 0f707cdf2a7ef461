//! OpenAI chat-completions text provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use storia_core::OpenAiConfig;

use crate::error::ProviderError;
use crate::http::{build_client, read_json, transport_error};
use crate::provider::TextCompletionProvider;

const PROVIDER: &str = "openai";

pub struct OpenAiTextProvider {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl Debug for OpenAiTextProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiTextProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiTextProvider {
    pub fn new(config: &OpenAiConfig, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http_client: build_client(PROVIDER, timeout)?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.text_model.clone(),
            max_tokens: config.text_max_tokens,
            temperature: config.text_temperature,
        })
    }
}

#[async_trait]
impl TextCompletionProvider for OpenAiTextProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[tracing::instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let parsed: ChatCompletionResponse = read_json(PROVIDER, response).await?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::EmptyResponse { provider: PROVIDER })?;

        tracing::debug!(completion_len = text.len(), "Text completion received");
        Ok(text)
    }
}
