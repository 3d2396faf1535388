use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::RosterError;

/// Budget every team starts with, in millions
pub const INITIAL_BUDGET: Decimal = Decimal::ONE_HUNDRED;

/// Roster size cap
pub const MAX_PLAYERS: usize = 15;

/// Shortest accepted team name, counted after trimming
pub const MIN_TEAM_NAME_LEN: usize = 3;

/// Display name of a fantasy team
///
/// # Invariants
/// - Stored trimmed
/// - At least three characters long
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(String);

impl TeamName {
    /// Creates a new TeamName, trimming surrounding whitespace
    ///
    /// # Example
    /// ```
    /// use fantazy_roster::domain::team::value_objects::TeamName;
    ///
    /// let name = TeamName::new("  Dream Team ").expect("valid name");
    /// assert_eq!(name.as_str(), "Dream Team");
    /// assert!(TeamName::new("ab").is_err());
    /// ```
    pub fn new(name: &str) -> Result<Self, RosterError> {
        let trimmed = name.trim();
        if trimmed.chars().count() < MIN_TEAM_NAME_LEN {
            return Err(RosterError::Validation(format!(
                "Team name must be at least {} characters",
                MIN_TEAM_NAME_LEN
            )));
        }
        Ok(TeamName(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of checking whether a player may join a team
///
/// Reasons are reported in rule order: roster cap, then budget, then
/// duplicates. Only the first failing rule is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddEligibility {
    Eligible,
    RosterFull,
    InsufficientBudget,
    AlreadyInRoster,
}

impl fmt::Display for AddEligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddEligibility::Eligible => write!(f, "eligible"),
            AddEligibility::RosterFull => write!(f, "roster full"),
            AddEligibility::InsufficientBudget => write!(f, "insufficient budget"),
            AddEligibility::AlreadyInRoster => write!(f, "already in roster"),
        }
    }
}
