//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use storia_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storia API",
        version = "0.1.0",
        description = "Generates Instagram story creative (background image, captions, hashtags) for catalog products and publishes the confirmed story through Instagram OAuth."
    ),
    paths(
        // Generation
        handlers::generate::generate_content,
        // Publish
        handlers::publish::begin_publish,
        handlers::publish::instagram_callback,
        handlers::hashtags::list_hashtags,
        // Catalog
        handlers::products::list_products,
        handlers::products::list_application_products,
        // Webhooks
        handlers::webhooks::receive_webhook,
    ),
    components(
        schemas(
            error::ErrorResponse,
            models::GenerateContentRequest,
            models::GenerationProduct,
            models::GenerateContentResponse,
            models::PublishQuery,
            models::PublishResponse,
            models::PublishOutcome,
            models::ProductDescriptor,
            models::ProductPage,
            models::PageInfo,
            models::MediaRef,
            handlers::hashtags::HashtagsResponse,
            handlers::webhooks::WebhookEvent,
            handlers::webhooks::WebhookEventInfo,
            handlers::webhooks::WebhookAck,
        )
    ),
    tags(
        (name = "generation", description = "Creative bundle generation"),
        (name = "publish", description = "Instagram story publishing"),
        (name = "catalog", description = "Commerce platform product listings"),
        (name = "webhooks", description = "Commerce platform webhooks")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
