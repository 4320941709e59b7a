//! Admin account management handlers. Super-admin only.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use keyhub_core::error::AppError;
use keyhub_core::types::pagination::PageResponse;
use keyhub_service::account::{CreateAdminRequest as SvcCreateAdmin, UpdateAdminRequest as SvcUpdateAdmin};

use crate::dto::request::{CreateAdminRequest, UpdateAdminRequest};
use crate::dto::response::{AdminResponse, ApiResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthAdmin, PaginationParams};
use crate::state::AppState;

/// Query parameters for the admin listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminListQuery {
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub per_page: Option<u64>,
    /// Email/name substring search.
    pub search: Option<String>,
}

/// GET /api/users
pub async fn list_admins(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Query(query): Query<AdminListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<AdminResponse>>>> {
    auth.require_super_admin()?;
    let page = PaginationParams::from((query.page, query.per_page)).into_page_request();
    let result = state
        .account_service
        .list(query.search.as_deref(), &page)
        .await?;
    Ok(Json(ApiResponse::ok(result.map(AdminResponse::from))))
}

/// POST /api/users
pub async fn create_admin(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(req): Json<CreateAdminRequest>,
) -> ApiResult<Json<ApiResponse<AdminResponse>>> {
    auth.require_super_admin()?;
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let admin = state
        .account_service
        .create(SvcCreateAdmin {
            email: req.email,
            name: req.name,
            password: req.password,
            role: req.role,
        })
        .await?;
    Ok(Json(ApiResponse::ok(admin.into())))
}

/// PUT /api/users/{id}
pub async fn update_admin(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAdminRequest>,
) -> ApiResult<Json<ApiResponse<AdminResponse>>> {
    auth.require_super_admin()?;
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let admin = state
        .account_service
        .update(
            id,
            SvcUpdateAdmin {
                name: req.name,
                role: req.role,
                password: req.password,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(admin.into())))
}

/// DELETE /api/users/{id}
pub async fn delete_admin(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    auth.require_super_admin()?;
    if id == auth.admin_id {
        return Err(AppError::validation("Cannot delete your own account").into());
    }
    state.account_service.delete(id).await?;
    Ok(Json(ApiResponse::ok(())))
}
