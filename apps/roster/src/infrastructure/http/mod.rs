// HTTP adapters for remote fantasy services

pub mod fantasy_client;

pub use fantasy_client::HttpFantasyClient;
