use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::matches::{MatchFilter, MatchStatus, ScheduledMatch};
use crate::services::{MatchPlacement, MatchQuery};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesQuery {
    pub team_id: Option<i64>,
    pub company: Option<String>,
    pub pool_id: Option<i64>,
    pub status: Option<MatchStatus>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub upcoming: bool,
    #[serde(default)]
    pub mine: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub score_team1: String,
    pub score_team2: String,
}

/// List matches with their event and teams
///
/// GET /api/v1/matches?teamId=&company=&poolId=&status=&start=&end=&upcoming=&mine=
pub async fn list_matches(
    State(state): State<AppState>,
    auth: Option<JwtAuth>,
    query: Result<Query<MatchesQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<ScheduledMatch>>, ApiError> {
    let Query(query) = query?;

    let user_id = if query.mine {
        let JwtAuth(access) =
            auth.ok_or_else(|| ApiError::unauthorized("Authentification requise"))?;
        Some(access.principal())
    } else {
        None
    };

    let matches = state
        .services
        .matches
        .list(MatchQuery {
            filter: MatchFilter {
                user_id,
                team_id: query.team_id,
                company: query.company,
                pool_id: query.pool_id,
                status: query.status,
                start: query.start,
                end: query.end,
            },
            upcoming: query.upcoming,
        })
        .await?;
    Ok(ApiResponse::ok(matches))
}

/// GET /api/v1/matches/:id
pub async fn get_match(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<ScheduledMatch>, ApiError> {
    let Path(id) = path?;
    Ok(ApiResponse::ok(state.services.matches.get(id).await?))
}

/// Place a match on a slot, opening the slot if needed
///
/// POST /api/v1/matches
pub async fn create_match(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    payload: Result<Json<MatchPlacement>, JsonRejection>,
) -> Result<ApiResponse<ScheduledMatch>, ApiError> {
    let Json(placement) = payload?;
    let created = state.services.matches.create(&access, placement).await?;
    Ok(ApiResponse::created(created))
}

/// Edit a match, possibly moving it to another slot
///
/// PUT /api/v1/matches/:id
pub async fn update_match(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<MatchPlacement>, JsonRejection>,
) -> Result<ApiResponse<ScheduledMatch>, ApiError> {
    let Path(id) = path?;
    let Json(placement) = payload?;
    let updated = state
        .services
        .matches
        .reschedule(&access, id, placement)
        .await?;
    Ok(ApiResponse::ok(updated))
}

/// DELETE /api/v1/matches/:id
pub async fn delete_match(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.services.matches.delete(&access, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record the final score and complete the match
///
/// PATCH /api/v1/matches/:id/score
pub async fn record_score(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<ApiResponse<ScheduledMatch>, ApiError> {
    let Path(id) = path?;
    let Json(score) = payload?;
    let updated = state
        .services
        .matches
        .record_score(&access, id, score.score_team1, score.score_team2)
        .await?;
    Ok(ApiResponse::ok(updated))
}
