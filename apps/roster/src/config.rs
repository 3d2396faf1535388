//! Configuration for the roster client and the fantasy team store
//!
//! Values come from the environment (after `dotenv` has loaded any `.env`
//! file). Every setting has a default except `DATABASE_URL`, whose absence
//! selects the in-memory repositories.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_FANTASY_BASE_URL: &str = "http://localhost:8082";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8082";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}

/// Settings for talking to a remote fantasy service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FANTASY_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Reads `FANTASY_BASE_URL` and `FANTASY_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("FANTASY_BASE_URL")
            .unwrap_or_else(|| DEFAULT_FANTASY_BASE_URL.to_string());

        let timeout_secs = parse_or(&lookup, "FANTASY_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "FANTASY_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Settings for the fantasy team store server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    /// JSON file of catalog players imported at startup
    pub player_seed: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, `BIND_ADDR` and `PLAYER_SEED_FILE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        let bind = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind.clone(),
        })?;

        let player_seed = lookup("PLAYER_SEED_FILE").map(PathBuf::from);

        Ok(Self {
            database_url,
            max_connections,
            bind_addr,
            player_seed,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
