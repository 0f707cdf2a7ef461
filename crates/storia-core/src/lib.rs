//! Storia Core Library
//!
//! This crate provides the domain models, error types, configuration, and validation
//! shared by the provider clients, the orchestration services, and the HTTP API.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{
    BaseConfig, Config, InstagramConfig, OpenAiConfig, PlatformConfig, PublishFlowConfig,
};
pub use error::{AppError, ErrorMetadata, GenerationError, LogLevel, PublishError};
pub use validation::{normalize_hashtag, normalize_hashtags, split_hashtag_list};
