use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::player::Player;
use crate::domain::repositories::{PlayerRepository, SaveTeamError, TeamRepository};
use crate::domain::team::Team;
use crate::domain::user::UserId;

/// In-process TeamRepository for development runs and tests
#[derive(Default)]
pub struct InMemoryTeamRepository {
    teams: RwLock<HashMap<Uuid, Team>>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn save(&self, team: &Team) -> Result<(), SaveTeamError> {
        let mut teams = self.teams.write().await;
        let owner_taken = teams
            .values()
            .any(|t| t.owner() == team.owner() && t.id() != team.id());
        if owner_taken {
            return Err(SaveTeamError::OwnerTaken(team.owner().clone()));
        }
        teams.insert(team.id(), team.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, String> {
        Ok(self.teams.read().await.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Team>, String> {
        let teams = self.teams.read().await;
        Ok(teams.values().find(|t| t.owner() == owner).cloned())
    }

    async fn top_by_points(&self, limit: usize) -> Result<Vec<Team>, String> {
        let mut ranked: Vec<Team> = self.teams.read().await.values().cloned().collect();
        ranked.sort_by(|a, b| {
            b.total_points()
                .cmp(&a.total_points())
                .then_with(|| a.name().cmp(b.name()))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }
}

/// In-process PlayerRepository for development runs and tests
#[derive(Default)]
pub struct InMemoryPlayerRepository {
    players: RwLock<HashMap<Uuid, Player>>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players: RwLock::new(players.into_iter().map(|p| (p.id, p)).collect()),
        }
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn list(&self) -> Result<Vec<Player>, String> {
        let mut players: Vec<Player> = self.players.read().await.values().cloned().collect();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(players)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Player>, String> {
        Ok(self.players.read().await.get(&id).cloned())
    }

    async fn save(&self, player: &Player) -> Result<(), String> {
        self.players.write().await.insert(player.id, player.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::Position;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn team_round_trips() {
        let repo = InMemoryTeamRepository::new();
        let (team, _) = Team::new(UserId::new("u1").unwrap(), "Dream Team").unwrap();

        repo.save(&team).await.unwrap();

        assert_eq!(repo.find_by_id(team.id()).await.unwrap(), Some(team.clone()));
        assert_eq!(
            repo.find_by_owner(&UserId::new("u1").unwrap()).await.unwrap(),
            Some(team)
        );
    }

    #[tokio::test]
    async fn one_team_per_owner() {
        let repo = InMemoryTeamRepository::new();
        let owner = UserId::new("u1").unwrap();
        let (first, _) = Team::new(owner.clone(), "First").unwrap();
        let (second, _) = Team::new(owner, "Second").unwrap();

        repo.save(&first).await.unwrap();

        assert_eq!(
            repo.save(&second).await,
            Err(SaveTeamError::OwnerTaken(UserId::new("u1").unwrap()))
        );
        assert!(repo.save(&first).await.is_ok());
    }

    #[tokio::test]
    async fn players_listed_by_name() {
        let repo = InMemoryPlayerRepository::with_players(vec![
            Player::new("Zidane", Position::Midfielder, Decimal::from(10)),
            Player::new("Baggio", Position::Forward, Decimal::from(9)),
        ]);

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["Baggio", "Zidane"]);
    }
}
