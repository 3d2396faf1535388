use super::events::TeamEvent;
use super::value_objects::{AddEligibility, TeamName, INITIAL_BUDGET, MAX_PLAYERS};
use crate::domain::errors::{RosterError, RosterResult};
use crate::domain::player::{Player, Position};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Team aggregate root
///
/// A user's fantasy team: its roster, the budget left to spend and the
/// points its players have earned.
///
/// # Invariants
/// - At most `MAX_PLAYERS` players, each id at most once
/// - `remaining_budget == INITIAL_BUDGET - sum(prices)` and never negative
/// - `total_points` is the sum of the roster's season points
///
/// # Example
/// ```
/// use fantazy_roster::domain::player::{Player, Position};
/// use fantazy_roster::domain::team::Team;
/// use fantazy_roster::domain::user::UserId;
/// use rust_decimal::Decimal;
///
/// let (mut team, events) = Team::new(UserId::new("u1").unwrap(), "Dream Team")
///     .expect("valid team");
/// assert_eq!(events.len(), 1);
///
/// team.add_player(Player::new("Striker", Position::Forward, Decimal::from(12)))
///     .expect("room and budget");
/// assert_eq!(team.remaining_budget(), Decimal::from(88));
/// assert_eq!(team.player_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    id: Uuid,
    owner: UserId,
    name: TeamName,
    players: Vec<Player>,
    remaining_budget: Decimal,
    total_points: u32,
    created_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new, empty Team with the full initial budget
    ///
    /// # Returns
    /// * `Ok((Team, Vec<TeamEvent>))` - New team and events generated
    /// * `Err(RosterError::Validation)` - If the name is shorter than three characters
    pub fn new(owner: UserId, name: &str) -> RosterResult<(Self, Vec<TeamEvent>)> {
        let name = TeamName::new(name)?;

        let team = Self {
            id: Uuid::new_v4(),
            owner,
            name,
            players: Vec::new(),
            remaining_budget: INITIAL_BUDGET,
            total_points: 0,
            created_at: Utc::now(),
        };

        let events = vec![TeamEvent::Created {
            team_id: team.id,
            owner: team.owner.clone(),
            name: team.name.to_string(),
        }];

        Ok((team, events))
    }

    /// Reports whether `player` could join the roster, first failing rule wins
    pub fn add_eligibility(&self, player: &Player) -> AddEligibility {
        if self.players.len() >= MAX_PLAYERS {
            AddEligibility::RosterFull
        } else if player.price > self.remaining_budget {
            AddEligibility::InsufficientBudget
        } else if self.contains(player.id) {
            AddEligibility::AlreadyInRoster
        } else {
            AddEligibility::Eligible
        }
    }

    /// Checks the add rules without mutating the team
    pub fn check_add(&self, player: &Player) -> RosterResult<()> {
        match self.add_eligibility(player) {
            AddEligibility::Eligible => Ok(()),
            AddEligibility::RosterFull => Err(RosterError::RosterFull { max: MAX_PLAYERS }),
            AddEligibility::InsufficientBudget => Err(RosterError::InsufficientBudget {
                price: player.price,
                remaining: self.remaining_budget,
            }),
            AddEligibility::AlreadyInRoster => Err(RosterError::DuplicatePlayer(player.id)),
        }
    }

    /// Checks that `player_id` can be released, returning the rostered player
    pub fn check_remove(&self, player_id: Uuid) -> RosterResult<&Player> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .ok_or(RosterError::PlayerNotInRoster(player_id))
    }

    /// Acquires a player, charging its price to the budget
    ///
    /// # Business Rules
    /// - Roster must have room
    /// - Price must fit the remaining budget
    /// - The player must not already be rostered
    pub fn add_player(&mut self, player: Player) -> RosterResult<TeamEvent> {
        self.check_add(&player)?;

        let event = TeamEvent::PlayerAdded {
            team_id: self.id,
            player_id: player.id,
            price: player.price,
        };

        let remaining = self
            .remaining_budget
            .checked_sub(player.price)
            .ok_or_else(|| {
                RosterError::Validation(format!("price {} is out of range", player.price))
            })?;
        let total_points = self
            .total_points
            .checked_add(player.total_points)
            .ok_or_else(|| {
                RosterError::Validation(format!(
                    "adding {} points would overflow the team total",
                    player.total_points
                ))
            })?;

        self.remaining_budget = remaining;
        self.total_points = total_points;
        self.players.push(player);

        Ok(event)
    }

    /// Releases a player, refunding its price
    pub fn remove_player(&mut self, player_id: Uuid) -> RosterResult<TeamEvent> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(RosterError::PlayerNotInRoster(player_id))?;

        let refunded = self
            .remaining_budget
            .checked_add(self.players[index].price)
            .ok_or_else(|| {
                RosterError::Validation(format!(
                    "refunding {} would overflow the budget",
                    self.players[index].price
                ))
            })?;

        let player = self.players.remove(index);
        self.remaining_budget = refunded;
        self.total_points = points_of(&self.players);

        Ok(TeamEvent::PlayerRemoved {
            team_id: self.id,
            player_id,
            price: player.price,
        })
    }

    /// Lists the invariants this snapshot breaks, if any
    ///
    /// Snapshots built by this aggregate never break them; the check exists
    /// for snapshots adopted from a remote store.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.players.len() > MAX_PLAYERS {
            violations.push(format!(
                "{} players exceeds the cap of {}",
                self.players.len(),
                MAX_PLAYERS
            ));
        }

        if self.remaining_budget < Decimal::ZERO {
            violations.push(format!("negative budget {}", self.remaining_budget));
        }

        match self.spent() {
            Some(spent) if INITIAL_BUDGET.checked_sub(spent) == Some(self.remaining_budget) => {}
            Some(spent) => violations.push(format!(
                "budget {} does not match {} minus spent {}",
                self.remaining_budget, INITIAL_BUDGET, spent
            )),
            None => violations.push("sum of player prices overflows".to_string()),
        }

        if points_of(&self.players) != self.total_points {
            violations.push(format!(
                "total points {} do not match the roster",
                self.total_points
            ));
        }

        for (i, player) in self.players.iter().enumerate() {
            if self.players[..i].iter().any(|p| p.id == player.id) {
                violations.push(format!("player {} rostered twice", player.id));
            }
        }

        violations
    }

    // ===== Queries =====

    /// True if `player_id` is on the roster
    pub fn contains(&self, player_id: Uuid) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    /// Rostered players at `position`, in acquisition order
    pub fn players_by_position(&self, position: Position) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.position == position)
            .collect()
    }

    /// Sum of the prices of rostered players, `None` if it overflows
    pub fn spent(&self) -> Option<Decimal> {
        self.players
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.price))
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn remaining_budget(&self) -> Decimal {
        self.remaining_budget
    }

    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs a Team from stored or transmitted data
    ///
    /// This method bypasses business rules validation: the data comes from
    /// the authoritative store and is adopted as-is.
    ///
    /// # Note
    /// Only to be used by repository implementations and wire adapters.
    pub fn from_persistence(
        id: Uuid,
        owner: UserId,
        name: TeamName,
        players: Vec<Player>,
        remaining_budget: Decimal,
        total_points: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            name,
            players,
            remaining_budget,
            total_points,
            created_at,
        }
    }
}

/// Season points of a roster, saturating at `u32::MAX`
fn points_of(players: &[Player]) -> u32 {
    players
        .iter()
        .fold(0u32, |acc, p| acc.saturating_add(p.total_points))
}
