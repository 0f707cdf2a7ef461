//! Publish flow models: inbound parameters, the confirmed story draft, the
//! short-lived Instagram session, and the per-attempt state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::constants::DEFAULT_LINK_TEXT;
use crate::error::PublishError;
use crate::validation::{is_http_url, split_hashtag_list};

/// States of a single publish attempt.
///
/// ```text
/// Idle -> AuthorizationRequested -> CodeReceived -> TokenExchanged
///      -> StoryContainerCreated -> Published
/// any non-Idle state -> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    Idle,
    AuthorizationRequested,
    CodeReceived,
    TokenExchanged,
    StoryContainerCreated,
    Published,
    Failed,
}

impl PublishState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PublishState::Published | PublishState::Failed)
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PublishState::Idle => "idle",
            PublishState::AuthorizationRequested => "authorization_requested",
            PublishState::CodeReceived => "code_received",
            PublishState::TokenExchanged => "token_exchanged",
            PublishState::StoryContainerCreated => "story_container_created",
            PublishState::Published => "published",
            PublishState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Query parameters of `GET /publish`.
///
/// The capitalized `ImageUrl` and camel-cased `hashTags` spellings used by older
/// frontends are accepted as aliases.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PublishQuery {
    #[serde(default, alias = "ImageUrl")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    /// Comma-separated hashtags
    #[serde(default, alias = "hashTags")]
    pub hashtags: Option<String>,
    #[serde(default)]
    pub product_link: Option<String>,
    /// Link sticker text; defaults to "Shop Now"
    #[serde(default)]
    pub link_text: Option<String>,
}

impl PublishQuery {
    /// Validate the four required creative parameters and build a [`StoryDraft`].
    ///
    /// Blank values count as missing. Every missing field is named in the error.
    pub fn into_draft(self) -> Result<StoryDraft, PublishError> {
        fn present(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let image_url = present(self.image_url);
        let caption = present(self.caption);
        let hashtags = present(self.hashtags)
            .map(|h| split_hashtag_list(&h))
            .filter(|h| !h.is_empty());
        let product_link = present(self.product_link);

        let mut missing = Vec::new();
        if image_url.is_none() {
            missing.push("imageUrl");
        }
        if caption.is_none() {
            missing.push("caption");
        }
        if hashtags.is_none() {
            missing.push("hashtags");
        }
        if product_link.is_none() {
            missing.push("productLink");
        }

        let (Some(image_url), Some(caption), Some(hashtags), Some(product_link)) =
            (image_url, caption, hashtags, product_link)
        else {
            return Err(PublishError::MissingParameters { fields: missing });
        };

        if !is_http_url(&image_url) {
            return Err(PublishError::InvalidParameter {
                field: "imageUrl",
                reason: "must be an absolute http(s) URL".to_string(),
            });
        }
        if !is_http_url(&product_link) {
            return Err(PublishError::InvalidParameter {
                field: "productLink",
                reason: "must be an absolute http(s) URL".to_string(),
            });
        }

        Ok(StoryDraft {
            image_url,
            caption,
            hashtags,
            product_link,
            link_text: present(self.link_text).unwrap_or_else(|| DEFAULT_LINK_TEXT.to_string()),
        })
    }
}

/// A confirmed creative selection waiting for Instagram authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDraft {
    pub image_url: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub product_link: String,
    pub link_text: String,
}

impl StoryDraft {
    /// Bind this draft to an authorized Instagram session.
    pub fn into_request(self, session: AuthSession) -> PublishRequest {
        PublishRequest {
            image_url: self.image_url,
            caption: self.caption,
            hashtags: self.hashtags,
            product_link: self.product_link,
            link_text: self.link_text,
            access_token: session.access_token,
            user_id: session.user_id,
        }
    }
}

/// Instagram credentials obtained from the code exchange. Held in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub user_id: String,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Everything needed to create and publish one story.
#[derive(Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub image_url: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub product_link: String,
    pub link_text: String,
    pub access_token: String,
    pub user_id: String,
}

impl fmt::Debug for PublishRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishRequest")
            .field("image_url", &self.image_url)
            .field("caption", &self.caption)
            .field("hashtags", &self.hashtags)
            .field("product_link", &self.product_link)
            .field("link_text", &self.link_text)
            .field("access_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Server-side record correlating an OAuth callback with its publish request.
#[derive(Debug, Clone)]
pub struct PendingPublish {
    pub nonce: Uuid,
    pub draft: StoryDraft,
    pub created_at: DateTime<Utc>,
}

/// Query parameters Instagram sends to the authorization callback.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_reason: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl CallbackQuery {
    /// Human-readable reason for a callback that carries no code.
    pub fn denial_reason(&self) -> String {
        match (
            self.error.as_deref(),
            self.error_reason.as_deref(),
            self.error_description.as_deref(),
        ) {
            (None, None, None) => "Authorization code not received".to_string(),
            (error, reason, description) => [error, reason, description]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(": "),
        }
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    pub media_id: String,
    pub status: String,
}

/// Response DTO for a successful publish
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublishResponse {
    pub success: bool,
    pub data: PublishOutcome,
}

impl From<PublishOutcome> for PublishResponse {
    fn from(data: PublishOutcome) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_query() -> PublishQuery {
        PublishQuery {
            image_url: Some("https://images.example.com/story.png".to_string()),
            caption: Some("Run further".to_string()),
            hashtags: Some("running, #shoes".to_string()),
            product_link: Some("https://shop.example.com/p/1".to_string()),
            link_text: None,
        }
    }

    #[test]
    fn test_into_draft_normalizes_and_defaults_link_text() {
        let draft = full_query().into_draft().unwrap();
        assert_eq!(draft.hashtags, vec!["#running", "#shoes"]);
        assert_eq!(draft.link_text, "Shop Now");
    }

    #[test]
    fn test_into_draft_names_all_missing_fields() {
        let query = PublishQuery {
            caption: Some("  ".to_string()),
            ..Default::default()
        };
        match query.into_draft() {
            Err(PublishError::MissingParameters { fields }) => assert_eq!(
                fields,
                vec!["imageUrl", "caption", "hashtags", "productLink"]
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_into_draft_treats_empty_hashtag_list_as_missing() {
        let query = PublishQuery {
            hashtags: Some(", ,#".to_string()),
            ..full_query()
        };
        match query.into_draft() {
            Err(PublishError::MissingParameters { fields }) => assert_eq!(fields, vec!["hashtags"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_into_draft_rejects_relative_product_link() {
        let query = PublishQuery {
            product_link: Some("/p/1".to_string()),
            ..full_query()
        };
        assert!(matches!(
            query.into_draft(),
            Err(PublishError::InvalidParameter {
                field: "productLink",
                ..
            })
        ));
    }

    #[test]
    fn test_query_accepts_legacy_aliases() {
        let query: PublishQuery = serde_json::from_value(serde_json::json!({
            "ImageUrl": "https://images.example.com/a.png",
            "caption": "c",
            "hashTags": "a,b",
            "productLink": "https://shop.example.com/p/2"
        }))
        .unwrap();
        assert!(query.into_draft().is_ok());
    }

    #[test]
    fn test_auth_session_debug_redacts_token() {
        let session = AuthSession {
            access_token: "IGQVJ-secret".to_string(),
            user_id: "17841400000000000".to_string(),
        };
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("IGQVJ-secret"));
        assert!(rendered.contains("17841400000000000"));
    }

    #[test]
    fn test_denial_reason() {
        assert_eq!(
            CallbackQuery::default().denial_reason(),
            "Authorization code not received"
        );
        let denied = CallbackQuery {
            error: Some("access_denied".to_string()),
            error_reason: Some("user_denied".to_string()),
            ..Default::default()
        };
        assert_eq!(denied.denial_reason(), "access_denied: user_denied");
    }

    #[test]
    fn test_terminal_states() {
        assert!(PublishState::Published.is_terminal());
        assert!(PublishState::Failed.is_terminal());
        assert!(!PublishState::TokenExchanged.is_terminal());
        assert_eq!(PublishState::CodeReceived.to_string(), "code_received");
    }
}
