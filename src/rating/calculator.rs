//! Rating calculator trait and team-level helpers
//!
//! This module defines the interface the match processor uses to turn a
//! match outcome into per-player rating updates.

use crate::types::ROSTER_SIZE;

/// Trait for calculating rating changes after matches
pub trait RatingCalculator: Send + Sync {
    /// Rating assigned to newly registered players
    fn initial_rating(&self) -> f64;

    /// Volatility multiplier for a player with the given hours played
    fn k_factor(&self, hours_played: f64) -> f64;

    /// Probability estimate of `rating` beating `opponent_rating`
    fn expected_score(&self, rating: f64, opponent_rating: f64) -> f64;

    /// Apply one update step
    ///
    /// # Arguments
    /// * `rating` - The player's current rating
    /// * `k_factor` - The player's K-factor for this match
    /// * `score` - Realized result of the player's team (1, 0.5 or 0)
    /// * `expected` - Expected score of the player's team
    fn updated_rating(&self, rating: f64, k_factor: f64, score: f64, expected: f64) -> f64 {
        rating + k_factor * (score - expected)
    }

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;
}

/// Team strength: the sum of member ratings divided by the fixed roster size
pub fn team_rating(member_ratings: &[f64; ROSTER_SIZE]) -> f64 {
    member_ratings.iter().sum::<f64>() / ROSTER_SIZE as f64
}

/// Realized match score for a team: 1 on a win, 0 on a loss, 0.5 on a draw
pub fn match_score(won: Option<bool>) -> f64 {
    match won {
        Some(true) => 1.0,
        Some(false) => 0.0,
        None => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_rating_is_mean_of_roster() {
        assert_eq!(team_rating(&[0.0; ROSTER_SIZE]), 0.0);
        assert_eq!(team_rating(&[10.0, 20.0, 30.0, 40.0, 50.0]), 30.0);
        assert_eq!(team_rating(&[-25.0, 25.0, 0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_match_score() {
        assert_eq!(match_score(Some(true)), 1.0);
        assert_eq!(match_score(Some(false)), 0.0);
        assert_eq!(match_score(None), 0.5);
    }
}
