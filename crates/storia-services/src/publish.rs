//! Story publish orchestration
//!
//! One attempt walks a strictly sequential state machine:
//!
//! ```text
//! Idle -> AuthorizationRequested -> CodeReceived -> TokenExchanged
//!      -> StoryContainerCreated -> Published
//! ```
//!
//! Any non-Idle state may fall to `Failed`. There is no compensation: a
//! created-but-unpublished container is left for Instagram to expire.

use std::sync::Arc;

use storia_core::models::{
    AuthSession, CallbackQuery, PublishOutcome, PublishQuery, PublishRequest, PublishState,
};
use storia_core::{AppError, PublishError};
use storia_providers::{
    InstagramApi, ProviderError, StickerPosition, StoryContainerSpec, StorySticker, TextStyle,
};

use crate::pending::PendingPublishStore;

const PUBLISHED_STATUS: &str = "published";

/// Tracks the state of a single publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishAttempt {
    state: PublishState,
}

impl Default for PublishAttempt {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishAttempt {
    pub fn new() -> Self {
        Self {
            state: PublishState::Idle,
        }
    }

    /// Resume an attempt whose authorization redirect was already issued.
    pub fn resumed() -> Self {
        Self {
            state: PublishState::AuthorizationRequested,
        }
    }

    pub fn state(&self) -> PublishState {
        self.state
    }

    pub fn is_valid_transition(from: PublishState, to: PublishState) -> bool {
        use PublishState::*;

        matches!(
            (from, to),
            (Idle, AuthorizationRequested)
                | (AuthorizationRequested, CodeReceived)
                | (CodeReceived, TokenExchanged)
                | (TokenExchanged, StoryContainerCreated)
                | (StoryContainerCreated, Published)
                | (AuthorizationRequested, Failed)
                | (CodeReceived, Failed)
                | (TokenExchanged, Failed)
                | (StoryContainerCreated, Failed)
        )
    }

    pub fn advance(&mut self, to: PublishState) -> Result<(), PublishError> {
        if !Self::is_valid_transition(self.state, to) {
            return Err(PublishError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        tracing::debug!(from = %self.state, to = %to, "Publish state transition");
        self.state = to;
        Ok(())
    }

    /// Move to `Failed` and hand the error back. Idle and terminal attempts stay put.
    fn fail(&mut self, error: PublishError) -> PublishError {
        if Self::is_valid_transition(self.state, PublishState::Failed) {
            self.state = PublishState::Failed;
        }
        error
    }
}

/// Overlays for the story: caption, hashtags, and the product link sticker.
pub fn compose_stickers(request: &PublishRequest) -> Vec<StorySticker> {
    vec![
        StorySticker::Text {
            text: request.caption.clone(),
            style: TextStyle {
                font_size: 28,
                color: "#FFFFFF".to_string(),
                background_color: Some("#00000080".to_string()),
            },
            position: StickerPosition { x: 0.5, y: 0.15 },
        },
        StorySticker::Text {
            text: request.hashtags.join(" "),
            style: TextStyle {
                font_size: 20,
                color: "#FFFFFF".to_string(),
                background_color: None,
            },
            position: StickerPosition { x: 0.5, y: 0.7 },
        },
        StorySticker::Link {
            url: request.product_link.clone(),
            text: request.link_text.clone(),
            position: StickerPosition { x: 0.5, y: 0.85 },
        },
    ]
}

fn rejected(step: &'static str, error: ProviderError) -> PublishError {
    tracing::error!(step, error = %error, "Instagram rejected the story");
    PublishError::PublishRejected {
        step,
        payload: error.payload(),
    }
}

#[derive(Debug, Clone)]
pub struct PublishOrchestrator {
    instagram: Arc<dyn InstagramApi>,
    pending: PendingPublishStore,
}

impl PublishOrchestrator {
    pub fn new(instagram: Arc<dyn InstagramApi>, pending: PendingPublishStore) -> Self {
        Self { instagram, pending }
    }

    /// Idle -> AuthorizationRequested.
    ///
    /// Validates the creative parameters, parks them, and returns the
    /// Instagram authorization URL to redirect the user to. No identity
    /// provider call is made here.
    #[tracing::instrument(skip(self, query))]
    pub async fn begin(&self, query: PublishQuery) -> Result<String, PublishError> {
        let mut attempt = PublishAttempt::new();
        let draft = query.into_draft()?;
        attempt.advance(PublishState::AuthorizationRequested)?;

        let nonce = self.pending.insert(draft).await;
        tracing::info!(nonce = %nonce, "Instagram authorization requested");

        Ok(self.instagram.authorization_url(&nonce.to_string()))
    }

    /// Drive the rest of the attempt from the OAuth callback.
    ///
    /// A callback without a code is `AuthorizationDenied` and never reaches
    /// the Graph API. An unknown or expired `state` is a bad request.
    #[tracing::instrument(skip(self, callback))]
    pub async fn complete(&self, callback: CallbackQuery) -> Result<PublishOutcome, AppError> {
        let draft = match callback.state.as_deref() {
            Some(state) => self.pending.take(state).await,
            None => None,
        };

        let mut attempt = PublishAttempt::resumed();

        let code = match callback.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code,
            _ => {
                let reason = callback.denial_reason();
                tracing::warn!(reason = %reason, "Instagram authorization denied");
                return Err(attempt.fail(PublishError::AuthorizationDenied(reason)).into());
            }
        };

        let draft = draft.ok_or_else(|| {
            AppError::BadRequest("Unknown or expired publish request".to_string())
        })?;
        attempt.advance(PublishState::CodeReceived)?;

        let session = self.exchange_code(&mut attempt, code).await?;
        let request = draft.into_request(session);

        Ok(self.publish_story(&mut attempt, &request).await?)
    }

    /// CodeReceived -> TokenExchanged.
    async fn exchange_code(
        &self,
        attempt: &mut PublishAttempt,
        code: &str,
    ) -> Result<AuthSession, PublishError> {
        match self.instagram.exchange_code(code).await {
            Ok(session) => {
                attempt.advance(PublishState::TokenExchanged)?;
                Ok(session)
            }
            Err(e) => {
                tracing::error!(error = %e, "Instagram code exchange failed");
                Err(attempt.fail(PublishError::TokenExchangeFailed(e.to_string())))
            }
        }
    }

    /// TokenExchanged -> StoryContainerCreated -> Published.
    #[tracing::instrument(skip(self, attempt, request), fields(user_id = %request.user_id))]
    pub async fn publish_story(
        &self,
        attempt: &mut PublishAttempt,
        request: &PublishRequest,
    ) -> Result<PublishOutcome, PublishError> {
        let account_id = self
            .instagram
            .resolve_account_id(&request.access_token)
            .await
            .map_err(|e| attempt.fail(rejected("resolve_account", e)))?;

        let spec = StoryContainerSpec {
            image_url: request.image_url.clone(),
            stickers: compose_stickers(request),
        };
        let container_id = self
            .instagram
            .create_story_container(&account_id, &request.access_token, &spec)
            .await
            .map_err(|e| attempt.fail(rejected("create_container", e)))?;
        attempt.advance(PublishState::StoryContainerCreated)?;

        let media_id = self
            .instagram
            .publish_container(&account_id, &request.access_token, &container_id)
            .await
            .map_err(|e| attempt.fail(rejected("publish_container", e)))?;
        attempt.advance(PublishState::Published)?;

        tracing::info!(media_id = %media_id, "Story published");
        Ok(PublishOutcome {
            media_id,
            status: PUBLISHED_STATUS.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct MockInstagram {
        calls: Mutex<Vec<&'static str>>,
        reject_exchange: bool,
        reject_container: bool,
        containers: Mutex<Vec<StoryContainerSpec>>,
    }

    impl MockInstagram {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InstagramApi for MockInstagram {
        fn authorization_url(&self, state: &str) -> String {
            format!("https://api.instagram.com/oauth/authorize?state={}", state)
        }

        async fn exchange_code(&self, _code: &str) -> Result<AuthSession, ProviderError> {
            self.calls.lock().unwrap().push("exchange_code");
            if self.reject_exchange {
                return Err(ProviderError::Status {
                    provider: "instagram",
                    status: 400,
                    body: json!({"error_message": "Invalid code"}),
                });
            }
            Ok(AuthSession {
                access_token: "IGQ-token".to_string(),
                user_id: "178414".to_string(),
            })
        }

        async fn resolve_account_id(&self, _access_token: &str) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push("resolve_account_id");
            Ok("178414".to_string())
        }

        async fn create_story_container(
            &self,
            _account_id: &str,
            _access_token: &str,
            spec: &StoryContainerSpec,
        ) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push("create_story_container");
            self.containers.lock().unwrap().push(spec.clone());
            if self.reject_container {
                return Err(ProviderError::Status {
                    provider: "instagram",
                    status: 400,
                    body: json!({"error": {"message": "Invalid image", "code": 9004}}),
                });
            }
            Ok("container-9".to_string())
        }

        async fn publish_container(
            &self,
            _account_id: &str,
            _access_token: &str,
            creation_id: &str,
        ) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push("publish_container");
            assert_eq!(creation_id, "container-9");
            Ok("media-77".to_string())
        }
    }

    fn query() -> PublishQuery {
        PublishQuery {
            image_url: Some("https://images.example.com/story.png".to_string()),
            caption: Some("Run the city".to_string()),
            hashtags: Some("#run,fitness".to_string()),
            product_link: Some("https://shop.example.com/p/1".to_string()),
            link_text: None,
        }
    }

    fn orchestrator(instagram: Arc<MockInstagram>) -> PublishOrchestrator {
        PublishOrchestrator::new(instagram, PendingPublishStore::new(Duration::from_secs(600)))
    }

    fn state_of(url: &str) -> String {
        url.split("state=").nth(1).unwrap().to_string()
    }

    fn callback(code: Option<&str>, state: Option<String>) -> CallbackQuery {
        CallbackQuery {
            code: code.map(str::to_string),
            state,
            ..Default::default()
        }
    }

    #[test]
    fn test_transition_table() {
        use PublishState::*;

        assert!(PublishAttempt::is_valid_transition(Idle, AuthorizationRequested));
        assert!(PublishAttempt::is_valid_transition(TokenExchanged, StoryContainerCreated));
        assert!(PublishAttempt::is_valid_transition(CodeReceived, Failed));
        assert!(!PublishAttempt::is_valid_transition(Idle, Failed));
        assert!(!PublishAttempt::is_valid_transition(CodeReceived, StoryContainerCreated));
        assert!(!PublishAttempt::is_valid_transition(Published, Failed));
        assert!(!PublishAttempt::is_valid_transition(Failed, Idle));
    }

    #[test]
    fn test_advance_rejects_skipped_state() {
        let mut attempt = PublishAttempt::new();
        let err = attempt.advance(PublishState::TokenExchanged).unwrap_err();
        assert!(matches!(err, PublishError::InvalidTransition { .. }));
        assert_eq!(attempt.state(), PublishState::Idle);
    }

    #[tokio::test]
    async fn test_full_publish_flow() {
        let instagram = Arc::new(MockInstagram::default());
        let orchestrator = orchestrator(instagram.clone());

        let url = orchestrator.begin(query()).await.unwrap();
        assert!(instagram.calls().is_empty());

        let outcome = orchestrator
            .complete(callback(Some("abc"), Some(state_of(&url))))
            .await
            .unwrap();

        assert_eq!(outcome.media_id, "media-77");
        assert_eq!(outcome.status, "published");
        assert_eq!(
            instagram.calls(),
            vec![
                "exchange_code",
                "resolve_account_id",
                "create_story_container",
                "publish_container"
            ]
        );

        let containers = instagram.containers.lock().unwrap();
        assert_eq!(containers[0].image_url, "https://images.example.com/story.png");
        assert_eq!(containers[0].stickers.len(), 3);
    }

    #[tokio::test]
    async fn test_begin_with_missing_parameters_makes_no_calls() {
        let instagram = Arc::new(MockInstagram::default());
        let err = orchestrator(instagram.clone())
            .begin(PublishQuery {
                product_link: None,
                ..query()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::MissingParameters { .. }));
        assert!(instagram.calls().is_empty());
    }

    #[tokio::test]
    async fn test_callback_without_code_is_denied_without_container_call() {
        let instagram = Arc::new(MockInstagram::default());
        let orchestrator = orchestrator(instagram.clone());
        let url = orchestrator.begin(query()).await.unwrap();

        let err = orchestrator
            .complete(callback(None, Some(state_of(&url))))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Publish(PublishError::AuthorizationDenied(_))
        ));
        assert!(instagram.calls().is_empty());
    }

    #[tokio::test]
    async fn test_callback_with_unknown_state_is_bad_request() {
        let instagram = Arc::new(MockInstagram::default());
        let err = orchestrator(instagram.clone())
            .complete(callback(Some("abc"), Some(uuid::Uuid::new_v4().to_string())))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(instagram.calls().is_empty());
    }

    #[tokio::test]
    async fn test_state_cannot_be_replayed() {
        let instagram = Arc::new(MockInstagram::default());
        let orchestrator = orchestrator(instagram.clone());
        let state = state_of(&orchestrator.begin(query()).await.unwrap());

        orchestrator
            .complete(callback(Some("abc"), Some(state.clone())))
            .await
            .unwrap();
        let replay = orchestrator
            .complete(callback(Some("abc"), Some(state)))
            .await
            .unwrap_err();
        assert!(matches!(replay, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_token_exchange_failure() {
        let instagram = Arc::new(MockInstagram {
            reject_exchange: true,
            ..Default::default()
        });
        let orchestrator = orchestrator(instagram.clone());
        let state = state_of(&orchestrator.begin(query()).await.unwrap());

        let err = orchestrator
            .complete(callback(Some("stale"), Some(state)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Publish(PublishError::TokenExchangeFailed(_))
        ));
        assert_eq!(instagram.calls(), vec!["exchange_code"]);
    }

    #[tokio::test]
    async fn test_container_rejection_passes_payload_through() {
        let instagram = Arc::new(MockInstagram {
            reject_container: true,
            ..Default::default()
        });
        let orchestrator = orchestrator(instagram.clone());
        let state = state_of(&orchestrator.begin(query()).await.unwrap());

        let err = orchestrator
            .complete(callback(Some("abc"), Some(state)))
            .await
            .unwrap_err();

        match err {
            AppError::Publish(PublishError::PublishRejected { step, payload }) => {
                assert_eq!(step, "create_container");
                assert_eq!(payload, json!({"error": {"message": "Invalid image", "code": 9004}}));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!instagram.calls().contains(&"publish_container"));
    }

    #[tokio::test]
    async fn test_failed_attempt_state() {
        let instagram = Arc::new(MockInstagram {
            reject_container: true,
            ..Default::default()
        });
        let orchestrator = orchestrator(instagram);
        let mut attempt = PublishAttempt::resumed();
        attempt.advance(PublishState::CodeReceived).unwrap();
        attempt.advance(PublishState::TokenExchanged).unwrap();

        let request = query().into_draft().unwrap().into_request(AuthSession {
            access_token: "IGQ-token".to_string(),
            user_id: "178414".to_string(),
        });
        assert!(orchestrator.publish_story(&mut attempt, &request).await.is_err());
        assert_eq!(attempt.state(), PublishState::Failed);
    }

    #[test]
    fn test_compose_stickers() {
        let request = query().into_draft().unwrap().into_request(AuthSession {
            access_token: "t".to_string(),
            user_id: "u".to_string(),
        });
        let stickers = compose_stickers(&request);

        match &stickers[1] {
            StorySticker::Text { text, .. } => assert_eq!(text, "#run #fitness"),
            other => panic!("unexpected sticker: {other:?}"),
        }
        match &stickers[2] {
            StorySticker::Link { url, text, .. } => {
                assert_eq!(url, "https://shop.example.com/p/1");
                assert_eq!(text, "Shop Now");
            }
            other => panic!("unexpected sticker: {other:?}"),
        }
    }
}
