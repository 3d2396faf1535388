use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::Position;

/// Upper bound on a player's season points; a full roster stays within `u32`
pub const MAX_SEASON_POINTS: u32 = 100_000;

/// A selectable player from the catalog
///
/// Players are read-only for the roster: their price and season aggregates
/// are owned by the catalog's upstream data source.
///
/// # Example
/// ```
/// use fantazy_roster::domain::player::{Player, Position};
/// use rust_decimal::Decimal;
///
/// let player = Player::new("Keeper", Position::Goalkeeper, Decimal::from(5))
///     .with_stats(0, 1, 12, 140);
///
/// assert_eq!(player.total_points, 140);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub position: Position,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub clean_sheets: u32,
    #[serde(default)]
    pub total_points: u32,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub club: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Player {
    /// Creates a player with a fresh id and empty season aggregates
    pub fn new(name: impl Into<String>, position: Position, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position,
            price,
            goals: 0,
            assists: 0,
            clean_sheets: 0,
            total_points: 0,
            nationality: String::new(),
            club: String::new(),
            image_url: None,
        }
    }

    /// Sets the season aggregates
    pub fn with_stats(mut self, goals: u32, assists: u32, clean_sheets: u32, total_points: u32) -> Self {
        self.goals = goals;
        self.assists = assists;
        self.clean_sheets = clean_sheets;
        self.total_points = total_points;
        self
    }

    /// Sets club and nationality
    pub fn with_origin(mut self, club: impl Into<String>, nationality: impl Into<String>) -> Self {
        self.club = club.into();
        self.nationality = nationality.into();
        self
    }

    /// Checks the catalog-level constraints on a player record
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Player name cannot be empty".to_string());
        }
        if self.price < Decimal::ZERO {
            return Err(format!("Player price cannot be negative: {}", self.price));
        }
        if self.total_points > MAX_SEASON_POINTS {
            return Err(format!(
                "Player points out of range: {} (max {})",
                self.total_points, MAX_SEASON_POINTS
            ));
        }
        Ok(())
    }
}
