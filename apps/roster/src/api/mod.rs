// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod dto;
pub mod errors;
pub mod extract;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::application::FantasyService;
use errors::ApiError;
use handlers::{players, teams};

/// Builds the fantasy service router
pub fn router(service: Arc<FantasyService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(players::health_check))
        // Catalog
        .route("/api/fantasy/players", get(players::list_players))
        // Teams
        .route("/api/fantasy/teams", post(teams::create_team))
        .route("/api/fantasy/teams/add-player", post(teams::add_player))
        .route(
            "/api/fantasy/teams/user/:user_id",
            get(teams::get_teams_by_user),
        )
        .route(
            "/api/fantasy/teams/:team_id/players/:player_id",
            delete(teams::remove_player),
        )
        .route("/api/fantasy/leaderboard", get(teams::leaderboard))
        .fallback(route_not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(service)
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
