use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::player::{Player, Position};
use crate::domain::repositories::PlayerRepository;

/// PostgreSQL implementation of PlayerRepository
pub struct PostgresPlayerRepository {
    pool: PgPool,
}

impl PostgresPlayerRepository {
    /// Creates a new PostgresPlayerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn count(row: &PgRow, column: &str) -> Result<u32, String> {
    let value: i32 = row
        .try_get(column)
        .map_err(|e| format!("Failed to read {}: {}", column, e))?;
    u32::try_from(value).map_err(|_| format!("Negative {} in database: {}", column, value))
}

/// Maps a row carrying the `players` columns to a Player
///
/// The row must expose `price`; team queries alias the price paid to it.
pub(crate) fn player_from_row(row: &PgRow) -> Result<Player, String> {
    let read = |e: sqlx::Error| format!("Failed to read player row: {}", e);

    Ok(Player {
        id: row.try_get::<Uuid, _>("id").map_err(read)?,
        name: row.try_get::<String, _>("name").map_err(read)?,
        position: row.try_get::<Position, _>("position").map_err(read)?,
        price: row.try_get::<Decimal, _>("price").map_err(read)?,
        goals: count(row, "goals")?,
        assists: count(row, "assists")?,
        clean_sheets: count(row, "clean_sheets")?,
        total_points: count(row, "total_points")?,
        nationality: row.try_get::<String, _>("nationality").map_err(read)?,
        club: row.try_get::<String, _>("club").map_err(read)?,
        image_url: row.try_get::<Option<String>, _>("image_url").map_err(read)?,
    })
}

fn to_db_count(value: u32) -> Result<i32, String> {
    i32::try_from(value).map_err(|_| format!("Count out of range: {}", value))
}

#[async_trait]
impl PlayerRepository for PostgresPlayerRepository {
    async fn list(&self) -> Result<Vec<Player>, String> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, position, price, goals, assists, clean_sheets,
                   total_points, nationality, club, image_url
            FROM players
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to list players: {}", e))?;

        rows.iter().map(player_from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Player>, String> {
        let row = sqlx::query(
            r#"
            SELECT id, name, position, price, goals, assists, clean_sheets,
                   total_points, nationality, club, image_url
            FROM players
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find player by id: {}", e))?;

        row.as_ref().map(player_from_row).transpose()
    }

    async fn save(&self, player: &Player) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO players (
                id, name, position, price, goals, assists, clean_sheets,
                total_points, nationality, club, image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                position = EXCLUDED.position,
                price = EXCLUDED.price,
                goals = EXCLUDED.goals,
                assists = EXCLUDED.assists,
                clean_sheets = EXCLUDED.clean_sheets,
                total_points = EXCLUDED.total_points,
                nationality = EXCLUDED.nationality,
                club = EXCLUDED.club,
                image_url = EXCLUDED.image_url
            "#,
        )
        .bind(player.id)
        .bind(&player.name)
        .bind(player.position)
        .bind(player.price)
        .bind(to_db_count(player.goals)?)
        .bind(to_db_count(player.assists)?)
        .bind(to_db_count(player.clean_sheets)?)
        .bind(to_db_count(player.total_points)?)
        .bind(&player.nationality)
        .bind(&player.club)
        .bind(&player.image_url)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to save player: {}", e))?;

        Ok(())
    }
}
