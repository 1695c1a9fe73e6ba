use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::event::{EventDetails, EventInput};

/// Query string of the event calendar
///
/// `month=YYYY-MM` takes precedence over `start`/`end`; with neither, the
/// current month is shown.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub month: Option<String>,
    #[serde(default)]
    pub mine: bool,
}

fn month_bounds(first: NaiveDate) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| ApiError::bad_request("Mois invalide"))?;
    Ok((first, last))
}

fn date_range(query: &EventsQuery) -> Result<(NaiveDate, NaiveDate), ApiError> {
    if let Some(month) = &query.month {
        let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
            .map_err(|_| ApiError::bad_request("Le mois doit être au format YYYY-MM"))?;
        return month_bounds(first);
    }

    match (query.start, query.end) {
        (Some(start), Some(end)) => Ok((start, end)),
        (None, None) => {
            let today = Utc::now().date_naive();
            let first = today
                .with_day(1)
                .ok_or_else(|| ApiError::bad_request("Mois invalide"))?;
            month_bounds(first)
        }
        _ => Err(ApiError::bad_request(
            "Les paramètres start et end vont ensemble",
        )),
    }
}

/// List events with their matches
///
/// GET /api/v1/events?month=YYYY-MM | start=&end= [&mine=true]
pub async fn list_events(
    State(state): State<AppState>,
    auth: Option<JwtAuth>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<EventDetails>>, ApiError> {
    let Query(query) = query?;
    let (start, end) = date_range(&query)?;

    let participant = if query.mine {
        let JwtAuth(access) =
            auth.ok_or_else(|| ApiError::unauthorized("Authentification requise"))?;
        Some(access.principal())
    } else {
        None
    };

    let events = state
        .services
        .events
        .get_by_date_range(start, end, participant)
        .await?;
    Ok(ApiResponse::ok(events))
}

/// GET /api/v1/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<EventDetails>, ApiError> {
    let Path(id) = path?;
    Ok(ApiResponse::ok(state.services.events.get(id).await?))
}

/// Create an event with 1 to 3 matches
///
/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> Result<ApiResponse<EventDetails>, ApiError> {
    let Json(input) = payload?;
    let event = state.services.events.create(&access, input).await?;
    Ok(ApiResponse::created(event))
}

/// Move an event and replace its matches
///
/// PUT /api/v1/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> Result<ApiResponse<EventDetails>, ApiError> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let event = state.services.events.update(&access, id, input).await?;
    Ok(ApiResponse::ok(event))
}

/// DELETE /api/v1/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    JwtAuth(access): JwtAuth,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.services.events.delete(&access, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
