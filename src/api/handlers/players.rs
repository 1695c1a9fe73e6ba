use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::player::{NewPlayer, Player};

/// GET /api/v1/players
pub async fn list_players(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Player>>, ApiError> {
    Ok(ApiResponse::ok(state.services.players.list().await?))
}

/// GET /api/v1/players/:id
pub async fn get_player(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<Player>, ApiError> {
    let Path(id) = path?;
    Ok(ApiResponse::ok(state.services.players.get(id).await?))
}

/// Register a player
///
/// POST /api/v1/players
pub async fn create_player(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    payload: Result<Json<NewPlayer>, JsonRejection>,
) -> Result<ApiResponse<Player>, ApiError> {
    let Json(new_player) = payload?;
    let player = state.services.players.create(&access, new_player).await?;
    Ok(ApiResponse::created(player))
}

/// PUT /api/v1/players/:id
pub async fn update_player(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewPlayer>, JsonRejection>,
) -> Result<ApiResponse<Player>, ApiError> {
    let Path(id) = path?;
    let Json(changes) = payload?;
    let player = state.services.players.update(&access, id, changes).await?;
    Ok(ApiResponse::ok(player))
}

/// DELETE /api/v1/players/:id
pub async fn delete_player(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.services.players.delete(&access, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
