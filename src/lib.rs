//! Squad Ladder - statistics microservice for five-player teams
//!
//! This crate keeps an in-memory pool of players and fixed five-player
//! teams, and ingests match results to update win/loss records and
//! ELO-style player ratings.

pub mod api;
pub mod config;
pub mod error;
pub mod matches;
pub mod metrics;
pub mod rating;
pub mod registry;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{LadderError, Result};
pub use types::*;

// Re-export key components
pub use matches::MatchProcessor;
pub use registry::{PlayerRegistry, TeamRegistry};
pub use service::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
