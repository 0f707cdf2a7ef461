//! OpenAI image-generation provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use storia_core::OpenAiConfig;

use crate::error::ProviderError;
use crate::http::{build_client, read_json, transport_error};
use crate::provider::ImageGenerationProvider;

const PROVIDER: &str = "openai";

pub struct OpenAiImageProvider {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    size: String,
}

impl Debug for OpenAiImageProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiImageProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("size", &self.size)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

impl OpenAiImageProvider {
    pub fn new(config: &OpenAiConfig, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http_client: build_client(PROVIDER, timeout)?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.image_model.clone(),
            size: config.image_size.clone(),
        })
    }
}

#[async_trait]
impl ImageGenerationProvider for OpenAiImageProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[tracing::instrument(skip(self, prompt), fields(model = %self.model, size = %self.size))]
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, ProviderError> {
        let body = ImageGenerationRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: &self.size,
        };

        let response = self
            .http_client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let parsed: ImageGenerationResponse = read_json(PROVIDER, response).await?;

        Ok(parsed
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty()))
    }
}
