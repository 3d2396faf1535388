use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, Url};
use uuid::Uuid;

use crate::api::dto::{AddPlayerRequest, CreateTeamRequest, ErrorBody, TeamDto};
use crate::application::LeaderboardEntry;
use crate::config::{ClientConfig, ConfigError};
use crate::domain::player::Player;
use crate::domain::team::Team;
use crate::domain::user::UserId;
use crate::roster::ports::{PlayerCatalog, StoreError, TeamStore};

/// HTTP adapter for a remote fantasy service
///
/// Implements both the team store and the player catalog ports. Any 4xx
/// answer is a conflict; transport failures, timeouts and 5xx answers mean
/// the service is unavailable. Requests are never retried.
#[derive(Debug, Clone)]
pub struct HttpFantasyClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpFantasyClient {
    /// Create a new client for the service at `config.base_url`
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.base_url).map_err(|_| ConfigError::Invalid {
            key: "FANTASY_BASE_URL",
            value: config.base_url.clone(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                key: "FANTASY_BASE_URL",
                value: config.base_url.clone(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.error,
            Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
            Err(_) => body,
        };
        tracing::debug!(%status, %message, "Fantasy service refused request");

        if status.is_client_error() {
            Err(StoreError::Conflict(message))
        } else {
            Err(StoreError::Unavailable(message))
        }
    }

    async fn read_team(response: Response) -> Result<Team, StoreError> {
        let dto: TeamDto = response.json().await.map_err(transport_error)?;
        Team::try_from(dto)
            .map_err(|e| StoreError::Unavailable(format!("Malformed team from service: {}", e)))
    }

    /// Teams ranked by total points
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let url = self.endpoint(&["api", "fantasy", "leaderboard"]);
        let response = self
            .send(self.client.get(url).query(&[("limit", limit)]))
            .await?;
        response.json().await.map_err(transport_error)
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Unavailable(format!("Request timed out: {}", err))
    } else if err.is_decode() {
        StoreError::Unavailable(format!("Unreadable response: {}", err))
    } else {
        StoreError::Unavailable(format!("Request failed: {}", err))
    }
}

#[async_trait]
impl TeamStore for HttpFantasyClient {
    async fn create_team(&self, owner: &UserId, name: &str) -> Result<Team, StoreError> {
        let url = self.endpoint(&["api", "fantasy", "teams"]);
        let body = CreateTeamRequest {
            user_id: owner.to_string(),
            team_name: name.to_string(),
        };
        let response = self.send(self.client.post(url).json(&body)).await?;
        Self::read_team(response).await
    }

    async fn find_by_user(&self, owner: &UserId) -> Result<Option<Team>, StoreError> {
        let url = self.endpoint(&["api", "fantasy", "teams", "user", owner.as_str()]);
        let response = self.send(self.client.get(url)).await?;
        let teams: Vec<TeamDto> = response.json().await.map_err(transport_error)?;

        teams
            .into_iter()
            .next()
            .map(|dto| {
                Team::try_from(dto).map_err(|e| {
                    StoreError::Unavailable(format!("Malformed team from service: {}", e))
                })
            })
            .transpose()
    }

    async fn add_player(&self, team_id: Uuid, player_id: Uuid) -> Result<Team, StoreError> {
        let url = self.endpoint(&["api", "fantasy", "teams", "add-player"]);
        let body = AddPlayerRequest { team_id, player_id };
        let response = self.send(self.client.post(url).json(&body)).await?;
        Self::read_team(response).await
    }

    async fn remove_player(&self, team_id: Uuid, player_id: Uuid) -> Result<Team, StoreError> {
        let team = team_id.to_string();
        let player = player_id.to_string();
        let url = self.endpoint(&["api", "fantasy", "teams", &team, "players", &player]);
        let response = self.send(self.client.delete(url)).await?;
        Self::read_team(response).await
    }
}

#[async_trait]
impl PlayerCatalog for HttpFantasyClient {
    async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        let url = self.endpoint(&["api", "fantasy", "players"]);
        let response = self.send(self.client.get(url)).await?;
        response.json().await.map_err(transport_error)
    }
}
