//! Storia provider integrations
//!
//! HTTP clients for the third-party services the extension delegates to, each
//! behind an async trait so the orchestration layer can be exercised without the
//! network:
//! - text completion and image generation (OpenAI)
//! - Instagram OAuth token exchange and Graph story publishing
//! - the commerce platform catalog

pub mod catalog;
pub mod error;
mod http;
pub mod instagram;
pub mod openai_image;
pub mod openai_text;
pub mod provider;

pub use catalog::PlatformCatalogClient;
pub use error::ProviderError;
pub use instagram::InstagramGraphClient;
pub use openai_image::OpenAiImageProvider;
pub use openai_text::OpenAiTextProvider;
pub use provider::{
    CatalogClient, ImageGenerationProvider, InstagramApi, StickerPosition, StoryContainerSpec,
    StorySticker, TextCompletionProvider, TextStyle,
};
