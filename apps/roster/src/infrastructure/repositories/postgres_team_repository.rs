use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::postgres_player_repository::player_from_row;
use crate::domain::repositories::{SaveTeamError, TeamRepository};
use crate::domain::team::{Team, TeamName};
use crate::domain::user::UserId;

/// Unique constraint on `fantasy_teams.user_id`
const OWNER_UNIQUE_CONSTRAINT: &str = "fantasy_teams_user_id_key";

/// PostgreSQL implementation of TeamRepository
///
/// A team is one `fantasy_teams` row plus its `fantasy_team_players` rows;
/// saving rewrites both inside a single transaction.
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a new PostgresTeamRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Rebuilds a Team from its row, loading the roster
    async fn hydrate(&self, row: &PgRow) -> Result<Team, String> {
        let read = |e: sqlx::Error| format!("Failed to read team row: {}", e);

        let id: Uuid = row.try_get("id").map_err(read)?;
        let owner: String = row.try_get("user_id").map_err(read)?;
        let name: String = row.try_get("team_name").map_err(read)?;
        let remaining_budget: Decimal = row.try_get("remaining_budget").map_err(read)?;
        let total_points: i32 = row.try_get("total_points").map_err(read)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;

        let roster = sqlx::query(
            r#"
            SELECT
                p.id, p.name, p.position, tp.price_paid AS price,
                p.goals, p.assists, p.clean_sheets, p.total_points,
                p.nationality, p.club, p.image_url
            FROM fantasy_team_players tp
            JOIN players p ON p.id = tp.player_id
            WHERE tp.team_id = $1
            ORDER BY tp.slot
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to load roster: {}", e))?;

        let players = roster
            .iter()
            .map(player_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Team::from_persistence(
            id,
            UserId::new(owner).map_err(|e| format!("Invalid owner in database: {}", e))?,
            TeamName::new(&name).map_err(|e| format!("Invalid team name in database: {}", e))?,
            players,
            remaining_budget,
            u32::try_from(total_points)
                .map_err(|_| format!("Negative total points in database: {}", total_points))?,
            created_at,
        ))
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn save(&self, team: &Team) -> Result<(), SaveTeamError> {
        let total_points = i32::try_from(team.total_points())
            .map_err(|_| format!("Total points out of range: {}", team.total_points()))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| format!("Failed to begin transaction: {}", e))?;

        sqlx::query(
            r#"
            INSERT INTO fantasy_teams (
                id, user_id, team_name, remaining_budget, total_points, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                team_name = EXCLUDED.team_name,
                remaining_budget = EXCLUDED.remaining_budget,
                total_points = EXCLUDED.total_points
            "#,
        )
        .bind(team.id())
        .bind(team.owner().as_str())
        .bind(team.name())
        .bind(team.remaining_budget())
        .bind(total_points)
        .bind(team.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| team_write_error(e, team.owner()))?;

        sqlx::query("DELETE FROM fantasy_team_players WHERE team_id = $1")
            .bind(team.id())
            .execute(&mut *tx)
            .await
            .map_err(|e| format!("Failed to clear roster: {}", e))?;

        for (slot, player) in team.players().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO fantasy_team_players (team_id, player_id, price_paid, slot)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(team.id())
            .bind(player.id)
            .bind(player.price)
            .bind(slot as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| format!("Failed to save roster entry: {}", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| format!("Failed to commit team: {}", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, String> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, team_name, remaining_budget, total_points, created_at
            FROM fantasy_teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find team by id: {}", e))?;

        match row {
            Some(row) => self.hydrate(&row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Team>, String> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, team_name, remaining_budget, total_points, created_at
            FROM fantasy_teams
            WHERE user_id = $1
            "#,
        )
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find team by owner: {}", e))?;

        match row {
            Some(row) => self.hydrate(&row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn top_by_points(&self, limit: usize) -> Result<Vec<Team>, String> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, team_name, remaining_budget, total_points, created_at
            FROM fantasy_teams
            ORDER BY total_points DESC, team_name
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to rank teams: {}", e))?;

        let mut teams = Vec::with_capacity(rows.len());
        for row in &rows {
            teams.push(self.hydrate(row).await?);
        }
        Ok(teams)
    }
}

/// Maps a failed team upsert, singling out a second team for the same owner
fn team_write_error(err: sqlx::Error, owner: &UserId) -> SaveTeamError {
    let owner_taken = err.as_database_error().is_some_and(|db| {
        db.is_unique_violation() && db.constraint() == Some(OWNER_UNIQUE_CONSTRAINT)
    });

    if owner_taken {
        SaveTeamError::OwnerTaken(owner.clone())
    } else {
        SaveTeamError::Storage(format!("Failed to save team: {}", err))
    }
}
