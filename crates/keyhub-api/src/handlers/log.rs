//! Auth log viewing handlers.

use axum::Json;
use axum::extract::{Query, State};

use keyhub_core::error::AppError;
use keyhub_core::types::pagination::PageResponse;
use keyhub_entity::authlog::AuthLogWithContext;

use crate::dto::request::LogListQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthAdmin, PaginationParams};
use crate::state::AppState;

/// GET /api/logs
pub async fn list_logs(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Query(query): Query<LogListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<AuthLogWithContext>>>> {
    let page = PaginationParams::from((query.page, query.per_page)).into_page_request();

    let status = match query.filter.as_deref() {
        None | Some("all") => None,
        Some("success") => Some(true),
        Some("fail") => Some(false),
        Some(other) => {
            return Err(AppError::validation(format!(
                "Invalid log filter: '{other}'. Expected one of: all, success, fail"
            ))
            .into());
        }
    };

    let result = state.auth_log_repo.search(status, &page).await?;
    Ok(Json(ApiResponse::ok(result)))
}
