// Player domain module
// Catalog records, positions and catalog filtering

#![allow(clippy::module_inception)]

pub mod filter;
pub mod player;
pub mod value_objects;

pub use filter::PlayerFilter;
pub use player::Player;
pub use value_objects::Position;
