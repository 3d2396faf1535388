use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::api::dto::{AddPlayerRequest, CreateTeamRequest, LeaderboardQuery, TeamDto};
use crate::api::errors::ApiError;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::application::{FantasyService, LeaderboardEntry, DEFAULT_LEADERBOARD_LIMIT};
use crate::domain::user::UserId;

/// Create the caller's team
///
/// POST /api/fantasy/teams
pub async fn create_team(
    State(service): State<Arc<FantasyService>>,
    ApiJson(req): ApiJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamDto>), ApiError> {
    let owner = UserId::new(req.user_id)?;
    let team = service.create_team(owner, &req.team_name).await?;

    Ok((StatusCode::CREATED, Json(TeamDto::from(&team))))
}

/// Teams of a user (zero or one)
///
/// GET /api/fantasy/teams/user/:user_id
pub async fn get_teams_by_user(
    State(service): State<Arc<FantasyService>>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<Json<Vec<TeamDto>>, ApiError> {
    let owner = UserId::new(user_id)?;
    let teams = service.teams_for_user(&owner).await?;

    Ok(Json(teams.iter().map(TeamDto::from).collect()))
}

/// Acquire a player
///
/// POST /api/fantasy/teams/add-player
pub async fn add_player(
    State(service): State<Arc<FantasyService>>,
    ApiJson(req): ApiJson<AddPlayerRequest>,
) -> Result<Json<TeamDto>, ApiError> {
    let team = service.add_player(req.team_id, req.player_id).await?;

    Ok(Json(TeamDto::from(&team)))
}

/// Release a player
///
/// DELETE /api/fantasy/teams/:team_id/players/:player_id
pub async fn remove_player(
    State(service): State<Arc<FantasyService>>,
    ApiPath((team_id, player_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<TeamDto>, ApiError> {
    let team = service.remove_player(team_id, player_id).await?;

    Ok(Json(TeamDto::from(&team)))
}

/// Teams ranked by total points
///
/// GET /api/fantasy/leaderboard?limit=N
pub async fn leaderboard(
    State(service): State<Arc<FantasyService>>,
    ApiQuery(query): ApiQuery<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let entries = service
        .leaderboard(query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT))
        .await?;

    Ok(Json(entries))
}
