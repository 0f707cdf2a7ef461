//! Error types module
//!
//! All errors surfaced to the HTTP layer are unified under [`AppError`]. The two
//! workflow taxonomies, [`GenerationError`] and [`PublishError`], are wrapped by
//! it so that handlers can use `?` on orchestrator results directly.
//!
//! Every error self-describes how it should be presented through [`ErrorMetadata`].

use std::io;

use serde_json::Value;

use crate::models::PublishState;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like provider hiccups
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "MALFORMED_COMPLETION")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Failures of the content-generation workflow.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Text provider unavailable: {0}")]
    TextProviderUnavailable(String),

    #[error("Malformed completion: {0}")]
    MalformedCompletion(String),

    /// The image provider answered but produced no image URL.
    #[error("Image provider returned no image")]
    ImageUnavailable,

    /// The image provider could not be reached or answered with an error.
    #[error("Image provider failed: {0}")]
    ImageProviderFailed(String),

    #[error("Incomplete creative bundle: missing {}", .missing.join(", "))]
    IncompleteBundle { missing: Vec<&'static str> },
}

/// Failures of the publish workflow.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Missing required parameters: {}", .fields.join(", "))]
    MissingParameters { fields: Vec<&'static str> },

    #[error("Invalid parameter {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Provider payload is kept verbatim for diagnosis.
    #[error("Publish rejected during {step}: {payload}")]
    PublishRejected { step: &'static str, payload: Value },

    #[error("Invalid publish transition: {from} -> {to}")]
    InvalidTransition { from: PublishState, to: PublishState },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// (http_status, error_code, recoverable, suggested_action, sensitive, log_level)
type StaticMetadata = (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
);

fn generation_error_static_metadata(err: &GenerationError) -> StaticMetadata {
    match err {
        GenerationError::TextProviderUnavailable(_) => (
            502,
            "TEXT_PROVIDER_UNAVAILABLE",
            true,
            Some("Retry generation after a short delay"),
            true,
            LogLevel::Error,
        ),
        GenerationError::MalformedCompletion(_) => (
            502,
            "MALFORMED_COMPLETION",
            true,
            Some("Retry generation"),
            false,
            LogLevel::Warn,
        ),
        GenerationError::ImageUnavailable => (
            502,
            "IMAGE_UNAVAILABLE",
            true,
            Some("Regenerate the image"),
            false,
            LogLevel::Warn,
        ),
        GenerationError::ImageProviderFailed(_) => (
            502,
            "IMAGE_PROVIDER_FAILED",
            true,
            Some("Regenerate the image after a short delay"),
            true,
            LogLevel::Error,
        ),
        GenerationError::IncompleteBundle { .. } => (
            400,
            "INCOMPLETE_BUNDLE",
            true,
            Some("Retry generation"),
            false,
            LogLevel::Warn,
        ),
    }
}

fn publish_error_static_metadata(err: &PublishError) -> StaticMetadata {
    match err {
        PublishError::MissingParameters { .. } => (
            400,
            "MISSING_PARAMETERS",
            false,
            Some("Select at least one caption and one hashtag, then publish again"),
            false,
            LogLevel::Debug,
        ),
        PublishError::InvalidParameter { .. } => (
            400,
            "INVALID_PARAMETER",
            false,
            Some("Check publish parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        PublishError::AuthorizationDenied(_) => (
            400,
            "AUTHORIZATION_DENIED",
            true,
            Some("Restart publishing and approve the Instagram authorization"),
            false,
            LogLevel::Debug,
        ),
        PublishError::TokenExchangeFailed(_) => (
            502,
            "TOKEN_EXCHANGE_FAILED",
            true,
            Some("Restart publishing from the beginning"),
            true,
            LogLevel::Error,
        ),
        PublishError::PublishRejected { .. } => (
            502,
            "PUBLISH_REJECTED",
            true,
            Some("Inspect the provider error and restart publishing"),
            false,
            LogLevel::Error,
        ),
        PublishError::InvalidTransition { .. } => (
            500,
            "INVALID_PUBLISH_TRANSITION",
            true,
            Some("Restart publishing from the beginning"),
            true,
            LogLevel::Error,
        ),
    }
}

fn app_error_static_metadata(err: &AppError) -> StaticMetadata {
    match err {
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Re-launch the extension to refresh the session"),
            false,
            LogLevel::Debug,
        ),
        AppError::Upstream(_) => (
            502,
            "UPSTREAM_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Generation(inner) => generation_error_static_metadata(inner),
        AppError::Publish(inner) => publish_error_static_metadata(inner),
    }
}

impl GenerationError {
    /// Whether this is one of the soft image outcomes that only blank the image field.
    pub fn is_image_soft_failure(&self) -> bool {
        matches!(
            self,
            GenerationError::ImageUnavailable | GenerationError::ImageProviderFailed(_)
        )
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Upstream(_) => "Upstream",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
            AppError::Generation(inner) => match inner {
                GenerationError::TextProviderUnavailable(_) => "TextProviderUnavailable",
                GenerationError::MalformedCompletion(_) => "MalformedCompletion",
                GenerationError::ImageUnavailable => "ImageUnavailable",
                GenerationError::ImageProviderFailed(_) => "ImageProviderFailed",
                GenerationError::IncompleteBundle { .. } => "IncompleteBundle",
            },
            AppError::Publish(inner) => match inner {
                PublishError::MissingParameters { .. } => "MissingParameters",
                PublishError::InvalidParameter { .. } => "InvalidParameter",
                PublishError::AuthorizationDenied(_) => "AuthorizationDenied",
                PublishError::TokenExchangeFailed(_) => "TokenExchangeFailed",
                PublishError::PublishRejected { .. } => "PublishRejected",
                PublishError::InvalidTransition { .. } => "InvalidTransition",
            },
        }
    }

    /// Raw third-party payload that must reach the client unmodified, if any.
    pub fn provider_payload(&self) -> Option<&Value> {
        match self {
            AppError::Publish(PublishError::PublishRejected { payload, .. }) => Some(payload),
            _ => None,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::Upstream(_) => "Upstream service error".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            AppError::Generation(inner) => match inner {
                GenerationError::TextProviderUnavailable(_) => {
                    "Failed to generate content: text provider unavailable".to_string()
                }
                GenerationError::MalformedCompletion(_) => {
                    "Failed to parse generated content".to_string()
                }
                GenerationError::ImageUnavailable => {
                    "Failed to generate content: no image was produced".to_string()
                }
                GenerationError::ImageProviderFailed(_) => {
                    "Failed to generate content: image provider unavailable".to_string()
                }
                GenerationError::IncompleteBundle { .. } => {
                    format!("Failed to generate content: {}", inner)
                }
            },
            AppError::Publish(inner) => match inner {
                PublishError::TokenExchangeFailed(_) => {
                    "Failed to process Instagram authorization".to_string()
                }
                PublishError::InvalidTransition { .. } => "Internal server error".to_string(),
                other => other.to_string(),
            },
        }
    }
}
