//! Running-clients handler.

use axum::Json;
use axum::extract::State;

use keyhub_entity::license::RunningClient;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthAdmin;
use crate::state::AppState;

/// GET /api/programs/active-clients
///
/// Every active `IN_USE` license annotated with liveness. The registry
/// cross-reference is best-effort; an unreachable registry only means
/// `running = false` everywhere.
pub async fn active_clients(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> ApiResult<Json<ApiResponse<Vec<RunningClient>>>> {
    let clients = state.activation_engine.list_running_clients().await?;
    Ok(Json(ApiResponse::ok(clients)))
}
