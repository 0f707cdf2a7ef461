//! Test helpers: build AppState and router with in-memory providers.
//!
//! Run from workspace root: `cargo test -p storia-api`.

pub mod mocks;

use axum_test::TestServer;
use mocks::{MockCatalog, MockImage, MockInstagram, MockText};
use std::collections::HashMap;
use std::sync::Arc;
use storia_api::setup::routes;
use storia_api::state::{AppState, Providers};
use storia_core::models::ExtensionSession;
use storia_core::Config;
use storia_services::{InMemorySessionStore, SessionStore};

pub const TEST_WEBHOOK_SECRET: &str = "ext-secret-for-tests";
pub const TEST_SESSION_ID: &str = "sess-test-0001";

/// Test application: server plus handles on the fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub instagram: Arc<MockInstagram>,
    pub catalog: Arc<MockCatalog>,
    pub sessions: Arc<InMemorySessionStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Fakes wired into the app. Defaults produce a fully successful run.
pub struct TestProviders {
    pub text: MockText,
    pub image: MockImage,
    pub instagram: MockInstagram,
    pub catalog: MockCatalog,
}

impl Default for TestProviders {
    fn default() -> Self {
        Self {
            text: MockText::valid(),
            image: MockImage::url("https://images.example.com/story.png"),
            instagram: MockInstagram::default(),
            catalog: MockCatalog::default(),
        }
    }
}

pub fn test_config() -> Config {
    let vars: HashMap<String, String> = [
        ("ENVIRONMENT", "test"),
        ("OPENAI_API_KEY", "sk-test-key-0000000000"),
        ("INSTAGRAM_CLIENT_ID", "1234567890"),
        ("INSTAGRAM_CLIENT_SECRET", "ig-secret"),
        ("INSTAGRAM_CALLBACK_DOMAIN", "https://storia.example.com"),
        ("EXTENSION_API_KEY", "ext-key"),
        ("EXTENSION_API_SECRET", TEST_WEBHOOK_SECRET),
        ("SUGGESTED_HASHTAGS", "sale, #newin,summer"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Config::from_map(&vars).expect("test config should load")
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestProviders::default()).await
}

pub async fn setup_test_app_with(providers: TestProviders) -> TestApp {
    let config = test_config();
    let instagram = Arc::new(providers.instagram);
    let catalog = Arc::new(providers.catalog);
    let sessions = Arc::new(InMemorySessionStore::new());

    let state = Arc::new(AppState::new(
        config.clone(),
        Providers {
            text: Arc::new(providers.text),
            image: Arc::new(providers.image),
            instagram: instagram.clone(),
            catalog: catalog.clone(),
        },
        sessions.clone(),
    ));

    let router = routes::setup_routes(&config, state.clone()).expect("routes should build");
    let server = TestServer::new(router.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        instagram,
        catalog,
        sessions,
    }
}

/// Register a live extension session for catalog requests.
pub async fn register_test_session(app: &TestApp) -> ExtensionSession {
    let session = ExtensionSession {
        session_id: TEST_SESSION_ID.to_string(),
        company_id: "42".to_string(),
        access_token: "platform-token".to_string(),
        expires_at: Some(chrono::Utc::now() + chrono::Duration::minutes(30)),
    };
    app.sessions
        .put(session.clone())
        .await
        .expect("session store should accept session");
    session
}
