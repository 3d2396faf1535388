use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::RosterError;
use crate::domain::player::Player;
use crate::domain::team::{Team, TeamName};
use crate::domain::user::UserId;

/// Team as exchanged with the fantasy service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub id: Uuid,
    pub user_id: String,
    pub team_name: String,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_budget: Decimal,
    #[serde(default)]
    pub total_points: u32,
    #[serde(default)]
    pub player_count: usize,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl From<&Team> for TeamDto {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id(),
            user_id: team.owner().to_string(),
            team_name: team.name().to_string(),
            players: team.players().to_vec(),
            remaining_budget: team.remaining_budget(),
            total_points: team.total_points(),
            player_count: team.player_count(),
            created_at: team.created_at(),
        }
    }
}

/// Adopts the service's snapshot as-is; `playerCount` is re-derived from the roster
impl TryFrom<TeamDto> for Team {
    type Error = RosterError;

    fn try_from(dto: TeamDto) -> Result<Self, Self::Error> {
        Ok(Team::from_persistence(
            dto.id,
            UserId::new(dto.user_id)?,
            TeamName::new(&dto.team_name)?,
            dto.players,
            dto.remaining_budget,
            dto.total_points,
            dto.created_at,
        ))
    }
}

/// Request body for creating a team
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub user_id: String,
    pub team_name: String,
}

/// Request body for acquiring a player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPlayerRequest {
    pub team_id: Uuid,
    pub player_id: Uuid,
}

/// Query string of the leaderboard endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

/// Error payload returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
