//! Commerce platform webhook receiver.

use crate::constants::WEBHOOK_SIGNATURE_HEADER;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use storia_core::AppError;
use storia_infra::verify_signature;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookEvent {
    pub event: WebhookEventInfo,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub company_id: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub payload: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookEventInfo {
    #[serde(default = "default_category")]
    pub category: String,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: String,
}

fn default_category() -> String {
    "company".to_string()
}

impl WebhookEvent {
    /// Routing key such as `company/product/delete`
    pub fn key(&self) -> String {
        format!(
            "{}/{}/{}",
            self.event.category, self.event.name, self.event.event_type
        )
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub success: bool,
}

fn dispatch(event: &WebhookEvent) {
    match event.key().as_str() {
        "company/product/delete" => {
            let product_uid = event
                .payload
                .get("product")
                .and_then(|p| p.get("uid"))
                .cloned()
                .unwrap_or(Value::Null);
            tracing::info!(
                company_id = ?event.company_id,
                product_uid = %product_uid,
                "Product deleted on platform"
            );
        }
        other => {
            tracing::debug!(event = other, "Unhandled webhook event");
        }
    }
}

/// Receive a signed platform webhook
#[utoipa::path(
    post,
    path = "/api/webhook-events",
    tag = "webhooks",
    request_body = WebhookEvent,
    responses(
        (status = 200, description = "Event accepted", body = WebhookAck),
        (status = 400, description = "Malformed event body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid signature", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, body), fields(body_len = body.len()))]
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing webhook signature".to_string()))?;

    if !verify_signature(&state.config.platform.api_secret, &body, signature) {
        return Err(AppError::Unauthorized("Invalid webhook signature".to_string()).into());
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook event: {}", e)))?;

    dispatch(&event);

    Ok(Json(WebhookAck { success: true }))
}
