use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Domain events that occur within the Team aggregate
///
/// The team store logs every event it applies, which gives an audit trail of
/// roster changes per team.
///
/// # Example
/// ```
/// use fantazy_roster::domain::team::events::TeamEvent;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let event = TeamEvent::PlayerAdded {
///     team_id: Uuid::new_v4(),
///     player_id: Uuid::new_v4(),
///     price: Decimal::from(12),
/// };
/// assert_eq!(event.name(), "player_added");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TeamEvent {
    /// Fired when a team is created
    Created {
        team_id: Uuid,
        owner: UserId,
        name: String,
    },
    /// Fired when a player joins the roster
    PlayerAdded {
        team_id: Uuid,
        player_id: Uuid,
        /// Amount charged to the budget
        price: Decimal,
    },
    /// Fired when a player leaves the roster
    PlayerRemoved {
        team_id: Uuid,
        player_id: Uuid,
        /// Amount refunded to the budget
        price: Decimal,
    },
}

impl TeamEvent {
    /// Returns the team_id for this event
    pub fn team_id(&self) -> Uuid {
        match self {
            TeamEvent::Created { team_id, .. } => *team_id,
            TeamEvent::PlayerAdded { team_id, .. } => *team_id,
            TeamEvent::PlayerRemoved { team_id, .. } => *team_id,
        }
    }

    /// Short event name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            TeamEvent::Created { .. } => "team_created",
            TeamEvent::PlayerAdded { .. } => "player_added",
            TeamEvent::PlayerRemoved { .. } => "player_removed",
        }
    }
}
