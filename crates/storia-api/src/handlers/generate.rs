use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use storia_core::models::{GenerateContentRequest, GenerateContentResponse, GenerationRequest};

/// Generate story creative for the selected products
#[utoipa::path(
    post,
    path = "/generate-content",
    tag = "generation",
    request_body = GenerateContentRequest,
    responses(
        (status = 200, description = "Complete creative bundle", body = GenerateContentResponse),
        (status = 400, description = "Invalid selection or incomplete bundle", body = ErrorResponse),
        (status = 502, description = "Text provider unavailable or malformed completion", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(products = request.products.len(), operation = "generate_content")
)]
pub async fn generate_content(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<GenerateContentRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = GenerationRequest::try_from(request)?;
    let bundle = state.generation.generate(&request).await?;

    Ok(Json(GenerateContentResponse::from(bundle)))
}
