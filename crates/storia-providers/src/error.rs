//! Provider-level errors.
//!
//! These never reach the HTTP layer directly: the orchestrators translate them
//! into the named generation and publish error kinds at the call site.

use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: Value,
    },

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str },

    #[error("{provider} response could not be decoded: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} is misconfigured: {message}")]
    Config {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Diagnostic payload to hand back to the caller.
    ///
    /// For HTTP failures this is the provider's own error body, unchanged.
    pub fn payload(&self) -> Value {
        match self {
            ProviderError::Status { body, .. } => body.clone(),
            other => json!({ "message": other.to_string() }),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
