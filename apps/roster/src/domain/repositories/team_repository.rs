use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::errors::RosterError;
use crate::domain::team::Team;
use crate::domain::user::UserId;

/// Why a team could not be saved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveTeamError {
    /// Another team is already stored for this owner
    #[error("User {0} already owns a team")]
    OwnerTaken(UserId),

    #[error("{0}")]
    Storage(String),
}

impl From<String> for SaveTeamError {
    fn from(message: String) -> Self {
        SaveTeamError::Storage(message)
    }
}

impl From<SaveTeamError> for RosterError {
    fn from(err: SaveTeamError) -> Self {
        match err {
            SaveTeamError::OwnerTaken(_) => RosterError::Conflict(err.to_string()),
            SaveTeamError::Storage(message) => RosterError::Unavailable(message),
        }
    }
}

/// Repository trait for Team aggregate
///
/// Defines the contract for persisting and retrieving teams.
/// Implementations should handle database-specific details.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Save a team with its full roster (insert or update)
    ///
    /// Fails with `OwnerTaken` when a different team already belongs to the
    /// same owner.
    async fn save(&self, team: &Team) -> Result<(), SaveTeamError>;

    /// Find a team by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, String>;

    /// Find the team owned by a user
    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Team>, String>;

    /// Teams ordered by total points (descending), then name
    async fn top_by_points(&self, limit: usize) -> Result<Vec<Team>, String>;
}
