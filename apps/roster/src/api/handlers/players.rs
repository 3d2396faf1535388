use std::sync::Arc;

use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::application::FantasyService;
use crate::domain::player::Player;

/// Full player catalog
///
/// GET /api/fantasy/players
pub async fn list_players(
    State(service): State<Arc<FantasyService>>,
) -> Result<Json<Vec<Player>>, ApiError> {
    Ok(Json(service.list_players().await?))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
