//! Dashboard statistics handler.

use axum::Json;
use axum::extract::State;

use keyhub_service::stats::DashboardStats;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthAdmin;
use crate::state::AppState;

/// GET /api/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> ApiResult<Json<ApiResponse<DashboardStats>>> {
    let stats = state.stats_service.dashboard().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
