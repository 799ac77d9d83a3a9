//! Admin authentication extractor.
//!
//! Administrative mutation endpoints take a [`RequireAdmin`] parameter;
//! extraction fails with 401 unless the request carries an active
//! session token, either as `Authorization: Bearer <token>` or a
//! `token` query parameter (the form the original clients use).

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use bookstack_core::AdminId;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires an active admin session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin_id): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("hello, admin {admin_id}")
/// }
/// ```
pub struct RequireAdmin(pub AdminId);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| query_token(parts))
            .ok_or_else(|| AppError::Unauthorized("missing session token".to_owned()))?;

        let admin_id = state
            .sessions()
            .get(&token)
            .ok_or_else(|| AppError::Unauthorized("invalid or expired session token".to_owned()))?;

        Ok(Self(admin_id))
    }
}

/// Extract a bearer token from the Authorization header.
fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

/// Extract a `token` query parameter.
///
/// Tokens are URL-safe base64, so no percent-decoding is needed.
fn query_token(parts: &Parts) -> Option<String> {
    parts
        .uri
        .query()?
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .map(str::to_owned)
}
