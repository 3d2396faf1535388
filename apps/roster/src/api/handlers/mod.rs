// HTTP handlers of the fantasy team store

pub mod players;
pub mod teams;
