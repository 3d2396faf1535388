// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_player_repository;
pub mod postgres_team_repository;

pub use in_memory::{InMemoryPlayerRepository, InMemoryTeamRepository};
pub use postgres_player_repository::PostgresPlayerRepository;
pub use postgres_team_repository::PostgresTeamRepository;
