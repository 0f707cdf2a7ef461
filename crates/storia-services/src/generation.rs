//! Content generation orchestration
//!
//! Selected products in, a complete [`CreativeBundle`] out. Partial results are
//! never returned as success: a missing image, caption set or hashtag set ends
//! in [`GenerationError::IncompleteBundle`].

use std::sync::Arc;

use storia_core::models::{CompletionContent, CreativeBundle, GenerationRequest};
use storia_core::GenerationError;
use storia_providers::{ImageGenerationProvider, TextCompletionProvider};

use crate::prompt::{build_image_prompt, build_text_prompt};

#[derive(Debug, Clone)]
pub struct ContentGenerationOrchestrator {
    text: Arc<dyn TextCompletionProvider>,
    image: Arc<dyn ImageGenerationProvider>,
}

impl ContentGenerationOrchestrator {
    pub fn new(
        text: Arc<dyn TextCompletionProvider>,
        image: Arc<dyn ImageGenerationProvider>,
    ) -> Self {
        Self { text, image }
    }

    /// Run one generation attempt.
    ///
    /// The text and image calls are issued concurrently. Text failures are
    /// reported as-is; image failures only blank the image field and surface
    /// through the completeness gate. Nothing is retried or cached.
    #[tracing::instrument(skip(self, request), fields(products = request.products().len()))]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<CreativeBundle, GenerationError> {
        let text_prompt = build_text_prompt(request.products());
        let image_prompt = build_image_prompt(request.products());

        let (content, image) = tokio::join!(
            self.generate_text(&text_prompt),
            self.generate_image(&image_prompt)
        );
        let content = content?;

        let image_url = match image {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = self.image.name(),
                    "Image generation produced no usable image"
                );
                None
            }
        };

        let bundle = CreativeBundle::assemble(image_url, Some(content))?;
        tracing::info!("Creative bundle generated");
        Ok(bundle)
    }

    async fn generate_text(&self, prompt: &str) -> Result<CompletionContent, GenerationError> {
        let completion = self.text.complete(prompt).await.map_err(|e| {
            tracing::error!(error = %e, provider = self.text.name(), "Text completion failed");
            GenerationError::TextProviderUnavailable(e.to_string())
        })?;

        parse_completion(&completion)
    }

    /// Image step with an explicit outcome: a URL, `ImageUnavailable`, or `ImageProviderFailed`.
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError> {
        match self.image.generate_image(prompt).await {
            Ok(Some(url)) => Ok(url),
            Ok(None) => Err(GenerationError::ImageUnavailable),
            Err(e) => Err(GenerationError::ImageProviderFailed(e.to_string())),
        }
    }
}

/// Parse a completion into validated captions and hashtags.
///
/// A surrounding markdown code fence is tolerated.
pub fn parse_completion(text: &str) -> Result<CompletionContent, GenerationError> {
    let json_text = if text.contains("```json") {
        text.split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
            .trim()
    } else if text.contains("```") {
        text.split("```")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
            .trim()
    } else {
        text.trim()
    };

    let content: CompletionContent = serde_json::from_str(json_text).map_err(|e| {
        tracing::warn!(error = %e, "Completion is not the expected JSON object");
        GenerationError::MalformedCompletion(e.to_string())
    })?;

    content.into_validated()
}
