use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::errors::RosterError;
use crate::domain::player::Player;
use crate::domain::team::Team;
use crate::domain::user::UserId;

/// Failures reported by a team store or player catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store refused the request on business grounds
    #[error("{0}")]
    Conflict(String),

    /// The store could not be reached or answered with a server failure
    #[error("{0}")]
    Unavailable(String),
}

impl From<StoreError> for RosterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => RosterError::Conflict(message),
            StoreError::Unavailable(message) => RosterError::Unavailable(message),
        }
    }
}

/// Authoritative owner of fantasy teams
///
/// Every mutation answers with the complete team snapshot as the store sees
/// it after the change.
#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn create_team(&self, owner: &UserId, name: &str) -> Result<Team, StoreError>;

    /// Zero or one team per user
    async fn find_by_user(&self, owner: &UserId) -> Result<Option<Team>, StoreError>;

    async fn add_player(&self, team_id: Uuid, player_id: Uuid) -> Result<Team, StoreError>;

    async fn remove_player(&self, team_id: Uuid, player_id: Uuid) -> Result<Team, StoreError>;
}

/// Read-only source of selectable players
#[async_trait]
pub trait PlayerCatalog: Send + Sync {
    async fn list_players(&self) -> Result<Vec<Player>, StoreError>;
}

#[async_trait]
impl<T: TeamStore + ?Sized> TeamStore for std::sync::Arc<T> {
    async fn create_team(&self, owner: &UserId, name: &str) -> Result<Team, StoreError> {
        (**self).create_team(owner, name).await
    }

    async fn find_by_user(&self, owner: &UserId) -> Result<Option<Team>, StoreError> {
        (**self).find_by_user(owner).await
    }

    async fn add_player(&self, team_id: Uuid, player_id: Uuid) -> Result<Team, StoreError> {
        (**self).add_player(team_id, player_id).await
    }

    async fn remove_player(&self, team_id: Uuid, player_id: Uuid) -> Result<Team, StoreError> {
        (**self).remove_player(team_id, player_id).await
    }
}
