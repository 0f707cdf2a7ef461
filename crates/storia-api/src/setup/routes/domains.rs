//! Domain route groups (generation, publish, catalog, webhooks).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn generation_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/generate-content",
        post(handlers::generate::generate_content),
    )
}

pub fn publish_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/publish", get(handlers::publish::begin_publish))
        .route(
            "/instagram/callback",
            get(handlers::publish::instagram_callback),
        )
        .route(
            &format!("{}/hashtags", API_PREFIX),
            get(handlers::hashtags::list_hashtags),
        )
}

pub fn catalog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/products", API_PREFIX),
            get(handlers::products::list_products),
        )
        .route(
            &format!("{}/products/application/{{application_id}}", API_PREFIX),
            get(handlers::products::list_application_products),
        )
}

pub fn webhook_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/webhook-events", API_PREFIX),
        post(handlers::webhooks::receive_webhook),
    )
}
