//! `AuthAdmin` extractor — pulls the JWT from the Authorization header,
//! validates it, and injects the admin context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use keyhub_core::error::AppError;
use keyhub_entity::admin::AdminRole;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated admin context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    /// Admin account ID.
    pub admin_id: Uuid,
    /// Login email.
    pub email: String,
    /// Role at token issuance.
    pub role: AdminRole,
}

impl AuthAdmin {
    /// Reject callers whose role may not manage admin accounts.
    pub fn require_super_admin(&self) -> Result<(), AppError> {
        if self.role.can_manage_admins() {
            Ok(())
        } else {
            Err(AppError::forbidden("Super admin role required"))
        }
    }
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError(AppError::unauthorized("Missing Authorization header")))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError(AppError::unauthorized("Invalid Authorization header format"))
        })?;

        let claims = state.jwt_decoder.decode_access_token(token)?;

        Ok(AuthAdmin {
            admin_id: claims.admin_id(),
            email: claims.email,
            role: claims.role,
        })
    }
}
