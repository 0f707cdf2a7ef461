//! In-memory provider fakes.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use storia_core::models::{
    AuthSession, ExtensionSession, MediaRef, PageInfo, ProductDescriptor, ProductListQuery,
    ProductPage,
};
use storia_providers::{
    CatalogClient, ImageGenerationProvider, InstagramApi, ProviderError, StoryContainerSpec,
    TextCompletionProvider,
};

pub fn valid_completion() -> String {
    json!({
        "captions": [
            "Step into speed",
            "Run the city",
            "Built for every mile",
            "Comfort meets style",
            "Your next personal best"
        ],
        "hashtags": ["#nike", "#running", "shoes", "#justdoit", "#sneakers"]
    })
    .to_string()
}

#[derive(Debug)]
pub struct MockText {
    reply: Result<String, u16>,
}

impl MockText {
    pub fn valid() -> Self {
        Self::reply(valid_completion())
    }

    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
        }
    }
}

#[async_trait]
impl TextCompletionProvider for MockText {
    fn name(&self) -> &'static str {
        "mock-text"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ProviderError::Status {
                provider: "mock-text",
                status: *status,
                body: json!({"error": {"message": "text provider down"}}),
            }),
        }
    }
}

#[derive(Debug)]
pub struct MockImage {
    reply: Result<Option<String>, u16>,
}

impl MockImage {
    pub fn url(url: &str) -> Self {
        Self {
            reply: Ok(Some(url.to_string())),
        }
    }

    pub fn none() -> Self {
        Self { reply: Ok(None) }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
        }
    }
}

#[async_trait]
impl ImageGenerationProvider for MockImage {
    fn name(&self) -> &'static str {
        "mock-image"
    }

    async fn generate_image(&self, _prompt: &str) -> Result<Option<String>, ProviderError> {
        match &self.reply {
            Ok(url) => Ok(url.clone()),
            Err(status) => Err(ProviderError::Status {
                provider: "mock-image",
                status: *status,
                body: json!({"error": {"message": "image provider down"}}),
            }),
        }
    }
}

/// Instagram fake. Set `reject_container` to make container creation fail
/// with the given Graph error body.
#[derive(Debug, Default)]
pub struct MockInstagram {
    pub reject_container: Option<Value>,
    pub fail_exchange: bool,
    pub exchanges: AtomicUsize,
    pub publishes: AtomicUsize,
    pub containers: Mutex<Vec<StoryContainerSpec>>,
}

impl MockInstagram {
    pub fn rejecting_container(body: Value) -> Self {
        Self {
            reject_container: Some(body),
            ..Default::default()
        }
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    pub fn publish_count(&self) -> usize {
        self.publishes.load(Ordering::SeqCst)
    }

    pub fn last_container(&self) -> Option<StoryContainerSpec> {
        self.containers.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl InstagramApi for MockInstagram {
    fn authorization_url(&self, state: &str) -> String {
        format!(
            "https://instagram.test/oauth/authorize?client_id=1234567890&response_type=code&state={}",
            state
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<AuthSession, ProviderError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if self.fail_exchange {
            return Err(ProviderError::Status {
                provider: "instagram",
                status: 400,
                body: json!({"error_type": "OAuthException", "error_message": "Invalid code"}),
            });
        }
        Ok(AuthSession {
            access_token: format!("token-for-{}", code),
            user_id: "17841400000000000".to_string(),
        })
    }

    async fn resolve_account_id(&self, _access_token: &str) -> Result<String, ProviderError> {
        Ok("17841400000000000".to_string())
    }

    async fn create_story_container(
        &self,
        _account_id: &str,
        _access_token: &str,
        spec: &StoryContainerSpec,
    ) -> Result<String, ProviderError> {
        self.containers.lock().unwrap().push(spec.clone());
        match &self.reject_container {
            Some(body) => Err(ProviderError::Status {
                provider: "instagram",
                status: 400,
                body: body.clone(),
            }),
            None => Ok("creation-1".to_string()),
        }
    }

    async fn publish_container(
        &self,
        _account_id: &str,
        _access_token: &str,
        creation_id: &str,
    ) -> Result<String, ProviderError> {
        self.publishes.fetch_add(1, Ordering::SeqCst);
        Ok(format!("media-{}", creation_id))
    }
}

#[derive(Debug, Default)]
pub struct MockCatalog {
    pub requests: Mutex<Vec<(String, Option<String>, u32, u32)>>,
}

impl MockCatalog {
    fn page(&self, query: &ProductListQuery) -> ProductPage {
        ProductPage {
            items: vec![ProductDescriptor {
                id: "7501".to_string(),
                name: Some("Air Zoom Pegasus".to_string()),
                brand_name: Some("Nike".to_string()),
                category_slug: Some("shoes".to_string()),
                item_code: Some("NK-PEG-40".to_string()),
                media_refs: vec![MediaRef {
                    url: "https://cdn.example.com/pegasus.jpg".to_string(),
                    media_type: Some("image".to_string()),
                }],
            }],
            page: PageInfo {
                current: query.page_no,
                size: query.page_size,
                has_next: false,
                item_total: 1,
            },
        }
    }
}

#[async_trait]
impl CatalogClient for MockCatalog {
    async fn get_products(
        &self,
        session: &ExtensionSession,
        query: &ProductListQuery,
    ) -> Result<ProductPage, ProviderError> {
        self.requests.lock().unwrap().push((
            session.company_id.clone(),
            None,
            query.page_no,
            query.page_size,
        ));
        Ok(self.page(query))
    }

    async fn get_app_products(
        &self,
        session: &ExtensionSession,
        application_id: &str,
        query: &ProductListQuery,
    ) -> Result<ProductPage, ProviderError> {
        self.requests.lock().unwrap().push((
            session.company_id.clone(),
            Some(application_id.to_string()),
            query.page_no,
            query.page_size,
        ));
        Ok(self.page(query))
    }
}
