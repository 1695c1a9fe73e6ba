use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::pool::{PoolDetails, PoolInput};

/// GET /api/v1/pools
pub async fn list_pools(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<PoolDetails>>, ApiError> {
    Ok(ApiResponse::ok(state.services.pools.list().await?))
}

/// GET /api/v1/pools/:id
pub async fn get_pool(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<PoolDetails>, ApiError> {
    let Path(id) = path?;
    Ok(ApiResponse::ok(state.services.pools.get(id).await?))
}

/// Create a pool of six teams
///
/// POST /api/v1/pools
pub async fn create_pool(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    payload: Result<Json<PoolInput>, JsonRejection>,
) -> Result<ApiResponse<PoolDetails>, ApiError> {
    let Json(input) = payload?;
    let pool = state.services.pools.create(&access, input).await?;
    Ok(ApiResponse::created(pool))
}

/// PUT /api/v1/pools/:id
pub async fn update_pool(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PoolInput>, JsonRejection>,
) -> Result<ApiResponse<PoolDetails>, ApiError> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let pool = state.services.pools.update(&access, id, input).await?;
    Ok(ApiResponse::ok(pool))
}

/// DELETE /api/v1/pools/:id
pub async fn delete_pool(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.services.pools.delete(&access, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
