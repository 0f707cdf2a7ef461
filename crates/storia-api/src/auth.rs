//! Extension session extraction.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use storia_core::models::ExtensionSession;
use storia_services::require_session;

use crate::constants::{SESSION_COOKIE, SESSION_HEADER};
use crate::error::HttpAppError;
use crate::state::AppState;

/// The merchant's extension session, resolved from the `ext_session` cookie
/// or the `x-ext-session` header.
#[derive(Debug, Clone)]
pub struct ExtensionContext(pub ExtensionSession);

fn session_id_from_parts(parts: &Parts) -> Option<String> {
    let from_cookie = parts
        .headers
        .get_all("Cookie")
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| value.trim().to_string())
        });

    from_cookie.or_else(|| {
        parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.trim().to_string())
    })
}

impl FromRequestParts<Arc<AppState>> for ExtensionContext {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session_id = session_id_from_parts(parts);
        let session = require_session(state.sessions.as_ref(), session_id.as_deref()).await?;
        tracing::debug!(company_id = %session.company_id, "Extension session resolved");
        Ok(ExtensionContext(session))
    }
}
