use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Redirect},
    Json,
};
use std::sync::Arc;
use storia_core::models::{CallbackQuery, PublishQuery, PublishResponse};

/// Start publishing: redirect to Instagram authorization
#[utoipa::path(
    get,
    path = "/publish",
    tag = "publish",
    params(PublishQuery),
    responses(
        (status = 303, description = "Redirect to the Instagram authorization page"),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "publish_begin"))]
pub async fn begin_publish(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PublishQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(query) = query?;
    let authorization_url = state.publish.begin(query).await?;

    Ok(Redirect::to(&authorization_url))
}

/// Instagram OAuth callback: exchange the code and publish the story
#[utoipa::path(
    get,
    path = "/instagram/callback",
    tag = "publish",
    params(CallbackQuery),
    responses(
        (status = 200, description = "Story published", body = PublishResponse),
        (status = 400, description = "Authorization denied or unknown state", body = ErrorResponse),
        (status = 502, description = "Token exchange failed or Instagram rejected the story", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "publish_callback"))]
pub async fn instagram_callback(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CallbackQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(callback) = query?;
    let outcome = state.publish.complete(callback).await?;

    Ok(Json(PublishResponse::from(outcome)))
}
