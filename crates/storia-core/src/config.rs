//! Configuration module
//!
//! All settings are read once at startup into [`Config`] and injected into the
//! services that need them. Nothing else in the workspace reads the environment.

use std::collections::HashMap;
use std::env;
use std::fmt;

use crate::validation::{is_http_url, normalize_hashtags};

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;
const PROVIDER_TIMEOUT_SECS: u64 = 120;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const PENDING_PUBLISH_TTL_SECS: u64 = 600;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_TEXT_MODEL: &str = "gpt-3.5-turbo";
const OPENAI_TEXT_MAX_TOKENS: u32 = 400;
const OPENAI_TEXT_TEMPERATURE: f32 = 0.7;
const OPENAI_IMAGE_MODEL: &str = "dall-e-2";
const OPENAI_IMAGE_SIZE: &str = "1024x1024";

const INSTAGRAM_AUTH_URL: &str = "https://api.instagram.com/oauth/authorize";
const INSTAGRAM_TOKEN_URL: &str = "https://api.instagram.com/oauth/access_token";
const INSTAGRAM_GRAPH_URL: &str = "https://graph.instagram.com/v21.0";

const FP_API_DOMAIN: &str = "https://api.fynd.com";
const SUGGESTED_HASHTAGS: &str = "#example,#hashtag,#fdk";

/// Server and environment settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_body_bytes: usize,
    pub http_concurrency_limit: usize,
    /// Timeout applied to every outbound provider call
    pub provider_timeout_secs: u64,
}

/// Text-completion and image-generation provider settings
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub text_max_tokens: u32,
    pub text_temperature: f32,
    pub image_model: String,
    pub image_size: String,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("text_max_tokens", &self.text_max_tokens)
            .field("text_temperature", &self.text_temperature)
            .field("image_model", &self.image_model)
            .field("image_size", &self.image_size)
            .finish()
    }
}

/// Instagram OAuth and Graph API settings
#[derive(Clone)]
pub struct InstagramConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Public origin Instagram redirects back to (e.g. an ngrok tunnel)
    pub callback_domain: String,
    pub auth_url: String,
    pub token_url: String,
    pub graph_url: String,
}

impl InstagramConfig {
    /// Absolute redirect URI registered with Instagram.
    pub fn redirect_uri(&self) -> String {
        format!(
            "{}/instagram/callback",
            self.callback_domain.trim_end_matches('/')
        )
    }
}

impl fmt::Debug for InstagramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstagramConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("callback_domain", &self.callback_domain)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("graph_url", &self.graph_url)
            .finish()
    }
}

/// Commerce platform extension settings
#[derive(Clone)]
pub struct PlatformConfig {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: Option<String>,
    /// Platform API cluster, e.g. `https://api.fynd.com`
    pub cluster: String,
}

impl fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("cluster", &self.cluster)
            .finish()
    }
}

/// Publish flow settings
#[derive(Clone, Debug)]
pub struct PublishFlowConfig {
    /// Lifetime of a pending publish waiting for its OAuth callback
    pub pending_ttl_secs: u64,
    /// Hashtags offered by `GET /api/hashtags`, already normalized
    pub suggested_hashtags: Vec<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub openai: OpenAiConfig,
    pub instagram: InstagramConfig,
    pub platform: PlatformConfig,
    pub publish: PublishFlowConfig,
}

impl Config {
    /// Load configuration from the process environment (and `.env` when present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an explicit key/value map.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let var_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            var(key).ok_or_else(|| anyhow::anyhow!("{} environment variable not set", key))
        };

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = var_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: var_or("PORT", &SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            max_body_bytes: var("MAX_BODY_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_BODY_BYTES),
            http_concurrency_limit: var("HTTP_CONCURRENCY_LIMIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            provider_timeout_secs: var("PROVIDER_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(PROVIDER_TIMEOUT_SECS),
        };

        let openai = OpenAiConfig {
            api_key: required("OPENAI_API_KEY")?,
            base_url: var_or("OPENAI_BASE_URL", OPENAI_BASE_URL),
            text_model: var_or("OPENAI_TEXT_MODEL", OPENAI_TEXT_MODEL),
            text_max_tokens: var("OPENAI_TEXT_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(OPENAI_TEXT_MAX_TOKENS),
            text_temperature: var("OPENAI_TEXT_TEMPERATURE")
                .map(|v| {
                    v.parse()
                        .map_err(|_| anyhow::anyhow!("OPENAI_TEXT_TEMPERATURE must be a number"))
                })
                .transpose()?
                .unwrap_or(OPENAI_TEXT_TEMPERATURE),
            image_model: var_or("OPENAI_IMAGE_MODEL", OPENAI_IMAGE_MODEL),
            image_size: var_or("OPENAI_IMAGE_SIZE", OPENAI_IMAGE_SIZE),
        };

        let instagram = InstagramConfig {
            client_id: required("INSTAGRAM_CLIENT_ID")?,
            client_secret: required("INSTAGRAM_CLIENT_SECRET")?,
            callback_domain: required("INSTAGRAM_CALLBACK_DOMAIN")?,
            auth_url: var_or("INSTAGRAM_AUTH_URL", INSTAGRAM_AUTH_URL),
            token_url: var_or("INSTAGRAM_TOKEN_URL", INSTAGRAM_TOKEN_URL),
            graph_url: var_or("INSTAGRAM_GRAPH_URL", INSTAGRAM_GRAPH_URL),
        };

        let platform = PlatformConfig {
            api_key: required("EXTENSION_API_KEY")?,
            api_secret: required("EXTENSION_API_SECRET")?,
            base_url: var("EXTENSION_BASE_URL"),
            cluster: var_or("FP_API_DOMAIN", FP_API_DOMAIN),
        };

        let publish = PublishFlowConfig {
            pending_ttl_secs: var("PENDING_PUBLISH_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(PENDING_PUBLISH_TTL_SECS),
            suggested_hashtags: normalize_hashtags(
                var_or("SUGGESTED_HASHTAGS", SUGGESTED_HASHTAGS).split(','),
            ),
        };

        Ok(Config {
            base,
            openai,
            instagram,
            platform,
            publish,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Fail fast on values that would only surface as runtime errors.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.base.max_body_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_BODY_BYTES cannot be 0"));
        }

        if self.base.provider_timeout_secs == 0 {
            return Err(anyhow::anyhow!("PROVIDER_TIMEOUT_SECS cannot be 0"));
        }

        if !(0.0..=2.0).contains(&self.openai.text_temperature) {
            return Err(anyhow::anyhow!(
                "OPENAI_TEXT_TEMPERATURE must be between 0 and 2"
            ));
        }

        if !is_square_size(&self.openai.image_size) {
            return Err(anyhow::anyhow!(
                "OPENAI_IMAGE_SIZE must be a square size such as 1024x1024"
            ));
        }

        if self.openai.text_max_tokens == 0 {
            return Err(anyhow::anyhow!("OPENAI_TEXT_MAX_TOKENS cannot be 0"));
        }

        for (key, value) in [
            ("INSTAGRAM_CALLBACK_DOMAIN", &self.instagram.callback_domain),
            ("INSTAGRAM_AUTH_URL", &self.instagram.auth_url),
            ("INSTAGRAM_TOKEN_URL", &self.instagram.token_url),
            ("INSTAGRAM_GRAPH_URL", &self.instagram.graph_url),
            ("OPENAI_BASE_URL", &self.openai.base_url),
            ("FP_API_DOMAIN", &self.platform.cluster),
        ] {
            if !is_http_url(value) {
                return Err(anyhow::anyhow!("{} must be an absolute http(s) URL", key));
            }
        }

        if self.publish.pending_ttl_secs == 0 {
            return Err(anyhow::anyhow!("PENDING_PUBLISH_TTL_SECS cannot be 0"));
        }

        Ok(())
    }
}

/// `NxN` with a positive N.
fn is_square_size(size: &str) -> bool {
    match size.split_once('x') {
        Some((width, height)) => width == height && width.parse::<u32>().is_ok_and(|n| n > 0),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_vars() -> HashMap<String, String> {
        [
            ("OPENAI_API_KEY", "sk-test-key-0000000000"),
            ("INSTAGRAM_CLIENT_ID", "1234567890"),
            ("INSTAGRAM_CLIENT_SECRET", "ig-secret"),
            ("INSTAGRAM_CALLBACK_DOMAIN", "https://storia.example.com/"),
            ("EXTENSION_API_KEY", "ext-key"),
            ("EXTENSION_API_SECRET", "ext-secret"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_map(&minimal_vars()).unwrap();
        assert_eq!(config.base.server_port, 3000);
        assert_eq!(config.base.max_body_bytes, 2 * 1024 * 1024);
        assert_eq!(config.openai.text_model, "gpt-3.5-turbo");
        assert_eq!(config.openai.image_size, "1024x1024");
        assert_eq!(config.publish.pending_ttl_secs, 600);
        assert_eq!(
            config.publish.suggested_hashtags,
            vec!["#example", "#hashtag", "#fdk"]
        );
        assert!(!config.is_production());
        config.validate().unwrap();
    }

    #[test]
    fn test_redirect_uri_trims_trailing_slash() {
        let config = Config::from_map(&minimal_vars()).unwrap();
        assert_eq!(
            config.instagram.redirect_uri(),
            "https://storia.example.com/instagram/callback"
        );
    }

    #[test]
    fn test_missing_required_key() {
        let mut vars = minimal_vars();
        vars.remove("OPENAI_API_KEY");
        let err = Config::from_map(&vars).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut vars = minimal_vars();
        vars.insert("ENVIRONMENT".to_string(), "production".to_string());
        let config = Config::from_map(&vars).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let mut vars = minimal_vars();
        vars.insert("OPENAI_TEXT_TEMPERATURE".to_string(), "3.5".to_string());
        let config = Config::from_map(&vars).unwrap();
        assert!(config.validate().is_err());

        vars.insert("OPENAI_TEXT_TEMPERATURE".to_string(), "warm".to_string());
        assert!(Config::from_map(&vars).is_err());
    }

    #[test]
    fn test_non_square_image_size_rejected() {
        let mut vars = minimal_vars();
        for size in ["1792x1024", "1024", "0x0", "axa"] {
            vars.insert("OPENAI_IMAGE_SIZE".to_string(), size.to_string());
            let config = Config::from_map(&vars).unwrap();
            assert!(config.validate().is_err(), "{size} should be rejected");
        }

        vars.insert("OPENAI_IMAGE_SIZE".to_string(), "512x512".to_string());
        assert!(Config::from_map(&vars).unwrap().validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_map(&minimal_vars()).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-test-key"));
        assert!(!rendered.contains("ig-secret"));
        assert!(!rendered.contains("ext-secret"));
    }
}
