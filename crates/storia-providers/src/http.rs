//! Shared response handling for provider clients.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::ProviderError;

pub(crate) fn build_client(provider: &'static str, timeout: Duration) -> anyhow::Result<reqwest::Client> {
    use anyhow::Context;

    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .with_context(|| format!("Failed to create HTTP client for {}", provider))
}

pub(crate) fn transport_error(provider: &'static str, err: reqwest::Error) -> ProviderError {
    // Strip the URL so query parameters never end up in logs.
    ProviderError::Transport {
        provider,
        message: err.without_url().to_string(),
    }
}

/// Decode a successful JSON body, or turn a non-2xx response into [`ProviderError::Status`]
/// carrying the provider's error body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(provider, e))?;

    if !status.is_success() {
        let body = serde_json::from_str::<Value>(&text)
            .unwrap_or_else(|_| json!({ "message": text }));
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&text).map_err(|e| ProviderError::Decode {
        provider,
        message: e.to_string(),
    })
}
