use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HashtagsResponse {
    pub items: Vec<String>,
}

/// Suggested hashtags for the publish screen
#[utoipa::path(
    get,
    path = "/api/hashtags",
    tag = "publish",
    responses(
        (status = 200, description = "Suggested hashtags", body = HashtagsResponse)
    )
)]
pub async fn list_hashtags(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HashtagsResponse {
        items: state.config.publish.suggested_hashtags.clone(),
    })
}
