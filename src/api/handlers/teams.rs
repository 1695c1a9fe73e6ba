use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::team::{NewTeam, TeamDetails, TeamFilter};

/// List teams with their players
///
/// GET /api/v1/teams?poolId=&company=
pub async fn list_teams(
    State(state): State<AppState>,
    query: Result<Query<TeamFilter>, QueryRejection>,
) -> Result<ApiResponse<Vec<TeamDetails>>, ApiError> {
    let Query(filter) = query?;
    Ok(ApiResponse::ok(state.services.teams.list(filter).await?))
}

/// GET /api/v1/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<TeamDetails>, ApiError> {
    let Path(id) = path?;
    Ok(ApiResponse::ok(state.services.teams.get(id).await?))
}

/// Create a new team
///
/// POST /api/v1/teams
pub async fn create_team(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    payload: Result<Json<NewTeam>, JsonRejection>,
) -> Result<ApiResponse<TeamDetails>, ApiError> {
    let Json(new_team) = payload?;
    let team = state.services.teams.create(&access, new_team).await?;
    Ok(ApiResponse::created(team))
}

/// PUT /api/v1/teams/:id
pub async fn update_team(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewTeam>, JsonRejection>,
) -> Result<ApiResponse<TeamDetails>, ApiError> {
    let Path(id) = path?;
    let Json(changes) = payload?;
    let team = state.services.teams.update(&access, id, changes).await?;
    Ok(ApiResponse::ok(team))
}

/// Delete a team
///
/// DELETE /api/v1/teams/:id
pub async fn delete_team(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.services.teams.delete(&access, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
