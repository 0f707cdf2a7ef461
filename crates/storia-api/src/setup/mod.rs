//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;
pub mod validation;

use crate::constants::PENDING_PURGE_INTERVAL_SECS;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use storia_core::Config;
use storia_services::{InMemorySessionStore, SessionStore};

/// Initialize the entire application with a process-local session store.
///
/// Nothing in this service issues extension sessions, so the catalog routes
/// answer 401 until sessions are written to the store by the platform launch
/// handshake. Deployments that run the handshake elsewhere should share that
/// store through [`initialize_app_with_sessions`].
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    initialize_app_with_sessions(config, Arc::new(InMemorySessionStore::new())).await
}

/// Initialize the application around an externally managed session store.
pub async fn initialize_app_with_sessions(
    config: Config,
    sessions: Arc<dyn SessionStore>,
) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    storia_infra::init_telemetry("storia-api", config.is_production())
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.base.environment,
        "Configuration loaded and validated successfully"
    );

    crate::error::set_hide_error_details(config.is_production());

    let providers = services::initialize_providers(&config)?;
    let state = Arc::new(AppState::new(config.clone(), providers, sessions));

    state
        .pending
        .clone()
        .start_purge(Duration::from_secs(PENDING_PURGE_INTERVAL_SECS));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
