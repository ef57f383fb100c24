//! Rating system: ELO expectation, K-factor tiers and team strength
//!
//! This module provides the rating math the match processor applies to
//! every player after a match.

pub mod calculator;
pub mod elo;

// Re-export commonly used types
pub use calculator::{match_score, team_rating, RatingCalculator};
pub use elo::{EloConfig, EloRatingCalculator, KFactorTier};
