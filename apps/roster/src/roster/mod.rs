// Roster management core
// Client-side view of one user's fantasy team, kept in step with the team store

pub mod manager;
pub mod ports;
pub mod summary;

pub use manager::{BusySignal, RosterManager};
pub use ports::{PlayerCatalog, StoreError, TeamStore};
pub use summary::RosterSummary;
