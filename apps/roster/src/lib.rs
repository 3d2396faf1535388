//! Fantasy roster library
//!
//! Holds the roster manager used by clients to build a fantasy team under
//! the squad cap and budget, together with the reference team store it talks
//! to: domain model, repositories, HTTP API and the HTTP client adapter.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod roster;
