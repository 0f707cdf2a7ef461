//! Application state shared by all handlers.

use std::sync::Arc;
use std::time::Duration;

use storia_core::Config;
use storia_providers::{
    CatalogClient, ImageGenerationProvider, InstagramApi, TextCompletionProvider,
};
use storia_services::{
    ContentGenerationOrchestrator, PendingPublishStore, PublishOrchestrator, SessionStore,
};

/// Outbound integrations, injected so tests can substitute in-memory fakes.
#[derive(Clone, Debug)]
pub struct Providers {
    pub text: Arc<dyn TextCompletionProvider>,
    pub image: Arc<dyn ImageGenerationProvider>,
    pub instagram: Arc<dyn InstagramApi>,
    pub catalog: Arc<dyn CatalogClient>,
}

pub struct AppState {
    pub config: Config,
    pub generation: ContentGenerationOrchestrator,
    pub publish: PublishOrchestrator,
    pub pending: Arc<PendingPublishStore>,
    pub catalog: Arc<dyn CatalogClient>,
    pub sessions: Arc<dyn SessionStore>,
    /// Provider names reported by `/health`
    pub provider_names: ProviderNames,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct ProviderNames {
    pub text: &'static str,
    pub image: &'static str,
}

impl AppState {
    pub fn new(config: Config, providers: Providers, sessions: Arc<dyn SessionStore>) -> Self {
        let pending = PendingPublishStore::new(Duration::from_secs(
            config.publish.pending_ttl_secs,
        ));

        let provider_names = ProviderNames {
            text: providers.text.name(),
            image: providers.image.name(),
        };

        Self {
            generation: ContentGenerationOrchestrator::new(providers.text, providers.image),
            publish: PublishOrchestrator::new(providers.instagram, pending.clone()),
            pending: Arc::new(pending),
            catalog: providers.catalog,
            sessions,
            provider_names,
            config,
        }
    }
}
