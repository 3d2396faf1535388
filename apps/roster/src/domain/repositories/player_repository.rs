use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::player::Player;

/// Repository trait for the player catalog
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// All catalog players, ordered by name
    async fn list(&self) -> Result<Vec<Player>, String>;

    /// Find a player by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Player>, String>;

    /// Insert or replace a catalog player
    async fn save(&self, player: &Player) -> Result<(), String>;
}
