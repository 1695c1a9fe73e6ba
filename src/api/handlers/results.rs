use axum::extract::State;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::services::{PersonalResults, RankingReport};

/// Company standings with the completed matches behind them
///
/// GET /api/v1/results/rankings
pub async fn rankings(
    State(state): State<AppState>,
) -> Result<ApiResponse<RankingReport>, ApiError> {
    Ok(ApiResponse::ok(state.services.results.ranking().await?))
}

/// Completed matches of the caller's player profile
///
/// GET /api/v1/results/my-results
pub async fn my_results(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
) -> Result<ApiResponse<PersonalResults>, ApiError> {
    let results = state.services.results.my_results(access.principal()).await?;
    Ok(ApiResponse::ok(results))
}
