// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod response;

use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::services::Services;
use handlers::{events, health, matches, players, pools, results, stats, teams};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(services: Services, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            services,
            jwt_secret: jwt_secret.into(),
        }
    }
}

/// Builds the full HTTP router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = Router::new()
        // Events
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Matches
        .route("/matches", get(matches::list_matches).post(matches::create_match))
        .route(
            "/matches/:id",
            get(matches::get_match)
                .put(matches::update_match)
                .delete(matches::delete_match),
        )
        .route("/matches/:id/score", patch(matches::record_score))
        // Teams
        .route("/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/teams/:id",
            get(teams::get_team)
                .put(teams::update_team)
                .delete(teams::delete_team),
        )
        // Pools
        .route("/pools", get(pools::list_pools).post(pools::create_pool))
        .route(
            "/pools/:id",
            get(pools::get_pool)
                .put(pools::update_pool)
                .delete(pools::delete_pool),
        )
        // Players
        .route("/players", get(players::list_players).post(players::create_player))
        .route(
            "/players/:id",
            get(players::get_player)
                .put(players::update_player)
                .delete(players::delete_player),
        )
        // Results
        .route("/results/rankings", get(results::rankings))
        .route("/results/my-results", get(results::my_results))
        // Admin
        .route("/admin/stats", get(stats::dashboard));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", v1)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
