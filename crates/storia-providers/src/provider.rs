//! Provider traits
//!
//! The orchestrators only see these traits. Concrete HTTP clients live in the
//! sibling modules; tests swap in in-memory implementations.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

use storia_core::models::{AuthSession, ExtensionSession, ProductListQuery, ProductPage};

use crate::error::ProviderError;

/// Chat-completion style text generation.
#[async_trait]
pub trait TextCompletionProvider: Send + Sync + Debug {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Send a single user prompt and return the trimmed completion text.
    ///
    /// An empty completion is reported as [`ProviderError::EmptyResponse`].
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Single square image generation.
#[async_trait]
pub trait ImageGenerationProvider: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Generate one image and return its hosted URL.
    ///
    /// `Ok(None)` means the provider answered but produced no usable URL.
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, ProviderError>;
}

/// Instagram OAuth and Graph publishing operations.
#[async_trait]
pub trait InstagramApi: Send + Sync + Debug {
    /// Authorization URL the user is redirected to; `state` is echoed back on the callback.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for a short-lived session.
    async fn exchange_code(&self, code: &str) -> Result<AuthSession, ProviderError>;

    /// Resolve the Graph account id that owns the token.
    async fn resolve_account_id(&self, access_token: &str) -> Result<String, ProviderError>;

    /// Create a story media container and return its id.
    async fn create_story_container(
        &self,
        account_id: &str,
        access_token: &str,
        spec: &StoryContainerSpec,
    ) -> Result<String, ProviderError>;

    /// Publish a previously created container and return the media id.
    async fn publish_container(
        &self,
        account_id: &str,
        access_token: &str,
        creation_id: &str,
    ) -> Result<String, ProviderError>;
}

/// Read-only access to the commerce platform's product catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync + Debug {
    /// Company-wide product listing.
    async fn get_products(
        &self,
        session: &ExtensionSession,
        query: &ProductListQuery,
    ) -> Result<ProductPage, ProviderError>;

    /// Products assigned to one sales channel application.
    async fn get_app_products(
        &self,
        session: &ExtensionSession,
        application_id: &str,
        query: &ProductListQuery,
    ) -> Result<ProductPage, ProviderError>;
}

/// Everything sent when creating a story container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryContainerSpec {
    pub image_url: String,
    pub stickers: Vec<StorySticker>,
}

/// Overlay placed on top of the story image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorySticker {
    Text {
        text: String,
        style: TextStyle,
        position: StickerPosition,
    },
    Link {
        url: String,
        text: String,
        position: StickerPosition,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_size: u32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// Sticker anchor in normalized story coordinates (0.0 to 1.0, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StickerPosition {
    pub x: f32,
    pub y: f32,
}
