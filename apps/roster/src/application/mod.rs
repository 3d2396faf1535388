// Application layer
// Use cases of the fantasy team store, shared by the HTTP API and in-process callers

pub mod fantasy_service;

pub use fantasy_service::{
    FantasyService, LeaderboardEntry, DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT,
};
