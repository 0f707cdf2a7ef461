use crate::auth::ExtensionContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use storia_core::models::{ProductListQuery, ProductPage};
use storia_core::AppError;
use storia_providers::ProviderError;
use validator::Validate;

fn catalog_error(err: ProviderError) -> AppError {
    match err.status() {
        Some(401) | Some(403) => {
            AppError::Unauthorized("Platform rejected the session token".to_string())
        }
        Some(404) => AppError::NotFound("Catalog resource not found".to_string()),
        _ => AppError::Upstream(err.to_string()),
    }
}

fn paging(query: Result<Query<ProductListQuery>, QueryRejection>) -> Result<ProductListQuery, HttpAppError> {
    let Query(query) = query?;
    query.validate().map_err(AppError::from)?;
    Ok(query)
}

/// List the company's catalog products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "catalog",
    params(ProductListQuery),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 401, description = "Missing or expired extension session", body = ErrorResponse),
        (status = 502, description = "Platform API error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, ctx, query),
    fields(company_id = %ctx.0.company_id, operation = "list_products")
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    ctx: ExtensionContext,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let query = paging(query)?;
    let page = state
        .catalog
        .get_products(&ctx.0, &query)
        .await
        .map_err(catalog_error)?;

    Ok(Json(page))
}

/// List products of one sales channel application
#[utoipa::path(
    get,
    path = "/api/products/application/{application_id}",
    tag = "catalog",
    params(
        ("application_id" = String, Path, description = "Sales channel application ID"),
        ProductListQuery
    ),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 401, description = "Missing or expired extension session", body = ErrorResponse),
        (status = 502, description = "Platform API error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, ctx, query),
    fields(company_id = %ctx.0.company_id, application_id = %application_id, operation = "list_app_products")
)]
pub async fn list_application_products(
    State(state): State<Arc<AppState>>,
    Path(application_id): Path<String>,
    ctx: ExtensionContext,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let query = paging(query)?;
    let page = state
        .catalog
        .get_app_products(&ctx.0, &application_id, &query)
        .await
        .map_err(catalog_error)?;

    Ok(Json(page))
}
