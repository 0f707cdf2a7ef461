//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use storia_core::Config;

/// Validate critical configuration values
///
/// Hard failures come from [`Config::validate`]; this adds warnings for
/// settings that work but are likely mistakes.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if !config.instagram.callback_domain.starts_with("https://") {
        tracing::warn!(
            callback_domain = %config.instagram.callback_domain,
            "INSTAGRAM_CALLBACK_DOMAIN is not HTTPS - Instagram will reject the redirect URI"
        );
    }

    if config.publish.pending_ttl_secs < 60 {
        tracing::warn!(
            pending_ttl_secs = config.publish.pending_ttl_secs,
            "PENDING_PUBLISH_TTL_SECS is very short - users may not finish authorizing in time"
        );
    }

    if config.publish.suggested_hashtags.is_empty() {
        tracing::warn!("No suggested hashtags configured");
    }

    Ok(())
}
