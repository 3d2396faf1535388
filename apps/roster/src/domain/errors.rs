use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while building or mutating a fantasy roster
///
/// The first six variants are detected locally from the cached team and are
/// always reported before any request reaches the team store. `Conflict` and
/// `Unavailable` come back from the store itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("No team has been created yet")]
    NoTeam,

    #[error("Roster is full ({max} players maximum)")]
    RosterFull { max: usize },

    #[error("Insufficient budget: player costs {price}M, {remaining}M remaining")]
    InsufficientBudget { price: Decimal, remaining: Decimal },

    #[error("Player {0} is already in the roster")]
    DuplicatePlayer(Uuid),

    #[error("Player {0} is not in the roster")]
    PlayerNotInRoster(Uuid),

    #[error("Unknown player: {0}")]
    UnknownPlayer(Uuid),

    #[error("Team store rejected the request: {0}")]
    Conflict(String),

    #[error("Team store unavailable: {0}")]
    Unavailable(String),
}

impl RosterError {
    /// True for errors detected from the cached team, without any store call
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            RosterError::Validation(_)
                | RosterError::NoTeam
                | RosterError::RosterFull { .. }
                | RosterError::InsufficientBudget { .. }
                | RosterError::DuplicatePlayer(_)
                | RosterError::PlayerNotInRoster(_)
        )
    }
}

pub type RosterResult<T> = Result<T, RosterError>;
