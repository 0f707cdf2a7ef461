//! Provider client construction

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use storia_core::Config;
use storia_providers::{
    InstagramGraphClient, OpenAiImageProvider, OpenAiTextProvider, PlatformCatalogClient,
};

use crate::state::Providers;

/// Build the production HTTP clients for every outbound integration
pub fn initialize_providers(config: &Config) -> Result<Providers> {
    let timeout = Duration::from_secs(config.base.provider_timeout_secs);

    let text = OpenAiTextProvider::new(&config.openai, timeout)
        .context("Failed to initialize text provider")?;
    let image = OpenAiImageProvider::new(&config.openai, timeout)
        .context("Failed to initialize image provider")?;
    let instagram = InstagramGraphClient::new(&config.instagram, timeout)
        .context("Failed to initialize Instagram client")?;
    let catalog = PlatformCatalogClient::new(&config.platform, timeout)
        .context("Failed to initialize platform catalog client")?;

    tracing::info!(
        text_model = %config.openai.text_model,
        image_model = %config.openai.image_model,
        graph_url = %config.instagram.graph_url,
        platform = %config.platform.cluster,
        "Provider clients initialized"
    );

    Ok(Providers {
        text: Arc::new(text),
        image: Arc::new(image),
        instagram: Arc::new(instagram),
        catalog: Arc::new(catalog),
    })
}
