//! Admin authentication handlers.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bookstack_core::AdminId;

use crate::error::AppError;
use crate::services::AdminAuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub requires_password_change: bool,
}

/// Password change request body.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Password change response body.
///
/// The session token is rotated on success; clients must switch to the
/// returned one.
#[derive(Debug, Serialize)]
pub struct ChangePasswordResponse {
    pub message: String,
    pub session_token: String,
}

/// Token passed as a query parameter.
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

/// Verify response body.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<AdminId>,
}

/// Plain message response body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /admin/login`.
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let auth = AdminAuthService::new(state.pool(), state.sessions(), state.password());
    let outcome = auth.login(&request.username, &request.password).await?;

    Ok(Json(LoginResponse {
        session_token: outcome.session_token,
        requires_password_change: outcome.requires_password_change,
    }))
}

/// `POST /admin/change-password?token=...`.
#[instrument(skip(state, query, request))]
pub async fn change_password(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ChangePasswordResponse>, AppError> {
    let auth = AdminAuthService::new(state.pool(), state.sessions(), state.password());
    let session_token = auth
        .change_password(&query.token, &request.old_password, &request.new_password)
        .await?;

    Ok(Json(ChangePasswordResponse {
        message: "Password changed successfully".to_owned(),
        session_token,
    }))
}

/// `GET /admin/verify?token=...`.
///
/// Never errors: an unknown token is reported as `valid: false`.
pub async fn verify(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Json<VerifyResponse> {
    let admin_id = state.sessions().get(&query.token);
    Json(VerifyResponse {
        valid: admin_id.is_some(),
        admin_id,
    })
}

/// `POST /admin/logout?token=...`.
///
/// Idempotent; always 200.
pub async fn logout(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Json<MessageResponse> {
    let auth = AdminAuthService::new(state.pool(), state.sessions(), state.password());
    auth.logout(&query.token);
    Json(MessageResponse {
        message: "Logged out successfully".to_owned(),
    })
}
