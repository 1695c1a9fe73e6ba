use axum::extract::State;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::services::DashboardCounts;

/// Row counts for the admin dashboard
///
/// GET /api/v1/admin/stats
pub async fn dashboard(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
) -> Result<ApiResponse<DashboardCounts>, ApiError> {
    Ok(ApiResponse::ok(state.services.stats.dashboard(&access).await?))
}
