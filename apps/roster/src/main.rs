use std::path::Path;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use fantazy_roster::api;
use fantazy_roster::application::FantasyService;
use fantazy_roster::config::ServerConfig;
use fantazy_roster::domain::player::Player;
use fantazy_roster::domain::repositories::{PlayerRepository, TeamRepository};
use fantazy_roster::infrastructure::repositories::{
    InMemoryPlayerRepository, InMemoryTeamRepository, PostgresPlayerRepository,
    PostgresTeamRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let (teams, players): (Arc<dyn TeamRepository>, Arc<dyn PlayerRepository>) =
        match &config.database_url {
            Some(database_url) => {
                tracing::info!("Connecting to database...");
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(database_url)
                    .await?;
                tracing::info!("Database connected successfully");

                (
                    Arc::new(PostgresTeamRepository::new(pool.clone())),
                    Arc::new(PostgresPlayerRepository::new(pool)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, teams are kept in memory");
                (
                    Arc::new(InMemoryTeamRepository::new()),
                    Arc::new(InMemoryPlayerRepository::new()),
                )
            }
        };

    let service = Arc::new(FantasyService::new(teams, players));

    if let Some(seed) = &config.player_seed {
        let imported = seed_players(&service, seed).await?;
        tracing::info!(count = imported, path = %seed.display(), "Player catalog seeded");
    }

    let app = api::router(service);

    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn seed_players(
    service: &FantasyService,
    path: &Path,
) -> Result<usize, Box<dyn std::error::Error>> {
    let raw = tokio::fs::read_to_string(path).await?;
    let players: Vec<Player> = serde_json::from_str(&raw)?;
    service.import_players(&players).await?;
    Ok(players.len())
}
