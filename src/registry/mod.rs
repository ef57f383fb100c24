//! In-memory repositories for players and teams
//!
//! Both registries are constructed once and shared by handle; nothing in
//! the crate keeps module-level state.

pub mod player;
pub mod team;

pub use player::{PlayerRegistry, PlayerTable};
pub use team::{TeamRegistry, TeamTable};
