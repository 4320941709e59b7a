//! Admin license management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use validator::Validate;

use keyhub_core::error::AppError;
use keyhub_core::types::pagination::PageResponse;
use keyhub_entity::license::{BulkDeleteFilter, License, LicenseDateField, LicenseSearch};
use keyhub_service::license::{BulkGenerateRequest as SvcBulkGenerate, BulkImportRow, ImportRow};

use crate::dto::request::{
    BulkDeleteRequest, BulkGenerateRequest, CreateLicenseRequest, LicenseListQuery,
    ToggleActiveRequest, UpdateUserNameRequest,
};
use crate::dto::response::{ApiResponse, BulkDeleteResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthAdmin, PaginationParams};
use crate::state::AppState;

/// GET /api/licenses
pub async fn list_licenses(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Query(query): Query<LicenseListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<License>>>> {
    let page = PaginationParams::from((query.page, query.per_page)).into_page_request();

    let date_field = match query.date_field.as_deref() {
        Some(raw) => Some(raw.parse::<LicenseDateField>()?),
        None => None,
    };

    let criteria = LicenseSearch {
        search: query.search,
        status: query.status,
        date_field,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    let result = state.license_service.search(&criteria, &page).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/licenses/{id}
pub async fn get_license(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<License>>> {
    let license = state.license_service.get(id).await?;
    Ok(Json(ApiResponse::ok(license)))
}

/// POST /api/licenses
pub async fn bulk_generate(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Json(req): Json<BulkGenerateRequest>,
) -> ApiResult<Json<ApiResponse<Vec<License>>>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let created = state
        .license_service
        .bulk_generate(&SvcBulkGenerate {
            program_name: req.program_name,
            client_id_prefix: req.client_id_prefix,
            count: req.count,
            expires_at: req.expires_at,
        })
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// POST /api/licenses/single
pub async fn create_single(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Json(req): Json<CreateLicenseRequest>,
) -> ApiResult<Json<ApiResponse<License>>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let license = state
        .license_service
        .create_single(req.program_name, req.client_id, req.license_key, req.expires_at)
        .await?;
    Ok(Json(ApiResponse::ok(license)))
}

/// DELETE /api/licenses/{id}
pub async fn delete_license(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.license_service.delete(id).await?;
    Ok(Json(ApiResponse::ok(())))
}

/// DELETE /api/licenses
pub async fn bulk_delete(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Json(req): Json<BulkDeleteRequest>,
) -> ApiResult<Json<ApiResponse<BulkDeleteResponse>>> {
    let deleted_count = state
        .license_service
        .bulk_delete(&BulkDeleteFilter {
            program_name: req.program_name,
            status: req.status,
        })
        .await?;
    Ok(Json(ApiResponse::ok(BulkDeleteResponse { deleted_count })))
}

/// POST /api/licenses/{id}/stop
pub async fn stop_license(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<License>>> {
    let license = state.activation_engine.stop(id).await?;
    Ok(Json(ApiResponse::ok(license)))
}

/// PATCH /api/licenses/{id}/active
pub async fn toggle_active(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(id): Path<i64>,
    Json(req): Json<ToggleActiveRequest>,
) -> ApiResult<Json<ApiResponse<License>>> {
    let license = state.activation_engine.set_active(id, req.is_active).await?;
    Ok(Json(ApiResponse::ok(license)))
}

/// PATCH /api/licenses/{id}/username
pub async fn update_user_name(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserNameRequest>,
) -> ApiResult<Json<ApiResponse<License>>> {
    let license = state
        .license_service
        .set_user_name(id, req.user_name.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(license)))
}

/// GET /api/licenses/export
pub async fn export_licenses(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> ApiResult<Json<ApiResponse<Vec<License>>>> {
    let licenses = state.license_service.export_all().await?;
    Ok(Json(ApiResponse::ok(licenses)))
}

/// POST /api/licenses/import
pub async fn import_licenses(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Json(rows): Json<Vec<ImportRow>>,
) -> ApiResult<Json<ApiResponse<Vec<License>>>> {
    let created = state.license_service.import(&rows).await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// POST /api/licenses/bulk-import
pub async fn bulk_import_licenses(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Json(rows): Json<Vec<BulkImportRow>>,
) -> ApiResult<Json<ApiResponse<Vec<License>>>> {
    let created = state.license_service.bulk_import(&rows).await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// GET /api/licenses/programs
pub async fn list_programs(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> ApiResult<Json<ApiResponse<Vec<String>>>> {
    let programs = state.license_service.programs().await?;
    Ok(Json(ApiResponse::ok(programs)))
}
