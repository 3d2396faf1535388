use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::team::{Team, INITIAL_BUDGET, MAX_PLAYERS};

/// Label shown for users who have not created a team yet
pub const DEFAULT_TEAM_NAME: &str = "My team";

/// Dashboard figures for one user's fantasy mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
    pub available_players: usize,
    pub player_count: usize,
    pub max_players: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_budget: Decimal,
    pub total_points: u32,
    pub team_name: String,
    pub has_team: bool,
}

impl RosterSummary {
    /// Builds the summary, falling back to an empty team at full budget
    pub fn new(available_players: usize, team: Option<&Team>) -> Self {
        match team {
            Some(team) => Self {
                available_players,
                player_count: team.player_count(),
                max_players: MAX_PLAYERS,
                remaining_budget: team.remaining_budget(),
                total_points: team.total_points(),
                team_name: team.name().to_string(),
                has_team: true,
            },
            None => Self {
                available_players,
                player_count: 0,
                max_players: MAX_PLAYERS,
                remaining_budget: INITIAL_BUDGET,
                total_points: 0,
                team_name: DEFAULT_TEAM_NAME.to_string(),
                has_team: false,
            },
        }
    }

    /// Roster fill as shown on the dashboard, e.g. `3/15`
    pub fn fill_label(&self) -> String {
        format!("{}/{}", self.player_count, self.max_players)
    }
}
