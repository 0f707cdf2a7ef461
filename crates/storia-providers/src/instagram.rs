//! Instagram OAuth and Graph API client

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use storia_core::constants::INSTAGRAM_PUBLISH_SCOPES;
use storia_core::models::AuthSession;
use storia_core::InstagramConfig;

use crate::error::ProviderError;
use crate::http::{build_client, read_json, transport_error};
use crate::provider::{InstagramApi, StoryContainerSpec, StorySticker};

const PROVIDER: &str = "instagram";
const STORY_MEDIA_TYPE: &str = "STORIES";

pub struct InstagramGraphClient {
    http_client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: reqwest::Url,
    token_url: String,
    graph_url: String,
}

impl Debug for InstagramGraphClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InstagramGraphClient")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("graph_url", &self.graph_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct TokenExchangeForm<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    redirect_uri: &'a str,
    code: &'a str,
}

/// The token endpoint answers either flat or wrapped in `data: [...]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenExchangeResponse {
    Wrapped { data: Vec<TokenGrant> },
    Flat(TokenGrant),
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    user_id: Value,
}

#[derive(Debug, Serialize)]
struct CreateContainerBody<'a> {
    image_url: &'a str,
    media_type: &'a str,
    stickers: &'a [StorySticker],
}

#[derive(Debug, Serialize)]
struct PublishContainerBody<'a> {
    creation_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: Value,
}

/// Graph ids arrive as strings or bare numbers depending on the endpoint.
fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn missing_field(field: &str) -> ProviderError {
    ProviderError::Decode {
        provider: PROVIDER,
        message: format!("response is missing `{}`", field),
    }
}

impl InstagramGraphClient {
    pub fn new(config: &InstagramConfig, timeout: Duration) -> anyhow::Result<Self> {
        let auth_url = reqwest::Url::parse(&config.auth_url)
            .with_context(|| format!("Invalid Instagram authorization URL: {}", config.auth_url))?;

        Ok(Self {
            http_client: build_client(PROVIDER, timeout)?,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri(),
            auth_url,
            token_url: config.token_url.clone(),
            graph_url: config.graph_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_for_id<B: Serialize + ?Sized>(
        &self,
        url: String,
        access_token: &str,
        body: &B,
    ) -> Result<String, ProviderError> {
        let response = self
            .http_client
            .post(url)
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let parsed: IdResponse = read_json(PROVIDER, response).await?;
        id_to_string(&parsed.id).ok_or_else(|| missing_field("id"))
    }
}

#[async_trait]
impl InstagramApi for InstagramGraphClient {
    fn authorization_url(&self, state: &str) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", INSTAGRAM_PUBLISH_SCOPES)
            .append_pair("response_type", "code")
            .append_pair("state", state);
        url.into()
    }

    #[tracing::instrument(skip(self, code))]
    async fn exchange_code(&self, code: &str) -> Result<AuthSession, ProviderError> {
        let form = TokenExchangeForm {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            grant_type: "authorization_code",
            redirect_uri: &self.redirect_uri,
            code,
        };

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let grant = match read_json::<TokenExchangeResponse>(PROVIDER, response).await? {
            TokenExchangeResponse::Flat(grant) => grant,
            TokenExchangeResponse::Wrapped { data } => data
                .into_iter()
                .next()
                .ok_or(ProviderError::EmptyResponse { provider: PROVIDER })?,
        };

        let user_id = id_to_string(&grant.user_id).ok_or_else(|| missing_field("user_id"))?;
        tracing::info!(user_id = %user_id, "Instagram authorization code exchanged");

        Ok(AuthSession {
            access_token: grant.access_token,
            user_id,
        })
    }

    #[tracing::instrument(skip(self, access_token))]
    async fn resolve_account_id(&self, access_token: &str) -> Result<String, ProviderError> {
        let response = self
            .http_client
            .get(format!("{}/me", self.graph_url))
            .query(&[("fields", "user_id,username")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let profile: Value = read_json(PROVIDER, response).await?;
        profile
            .get("user_id")
            .and_then(id_to_string)
            .or_else(|| profile.get("id").and_then(id_to_string))
            .ok_or_else(|| missing_field("user_id"))
    }

    #[tracing::instrument(skip(self, access_token, spec), fields(stickers = spec.stickers.len()))]
    async fn create_story_container(
        &self,
        account_id: &str,
        access_token: &str,
        spec: &StoryContainerSpec,
    ) -> Result<String, ProviderError> {
        let body = CreateContainerBody {
            image_url: &spec.image_url,
            media_type: STORY_MEDIA_TYPE,
            stickers: &spec.stickers,
        };
        self.post_for_id(
            format!("{}/{}/media", self.graph_url, account_id),
            access_token,
            &body,
        )
        .await
    }

    #[tracing::instrument(skip(self, access_token))]
    async fn publish_container(
        &self,
        account_id: &str,
        access_token: &str,
        creation_id: &str,
    ) -> Result<String, ProviderError> {
        self.post_for_id(
            format!("{}/{}/media_publish", self.graph_url, account_id),
            access_token,
            &PublishContainerBody { creation_id },
        )
        .await
    }
}
