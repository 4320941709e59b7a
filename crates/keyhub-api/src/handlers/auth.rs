//! Admin authentication handlers.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use keyhub_auth::jwt::TokenPair;
use keyhub_core::error::AppError;

use crate::dto::request::{LoginRequest, RefreshRequest};
use crate::dto::response::{AdminResponse, ApiResponse, LoginResponse};
use crate::error::ApiResult;
use crate::extractors::AuthAdmin;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let (admin, tokens) = state.account_service.login(&req.email, &req.password).await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        access_expires_at: tokens.access_expires_at,
        refresh_expires_at: tokens.refresh_expires_at,
        admin: admin.into(),
    })))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<TokenPair>>> {
    let tokens = state.account_service.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthAdmin,
) -> ApiResult<Json<ApiResponse<AdminResponse>>> {
    let admin = state.account_service.me(auth.admin_id).await?;
    Ok(Json(ApiResponse::ok(admin.into())))
}
