//! Common types used throughout the ladder service

use crate::utils::current_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = Uuid;

/// Unique identifier for teams
pub type TeamId = Uuid;

/// Number of players on every team
pub const ROSTER_SIZE: usize = 5;

/// A registered player and their cumulative statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    pub wins: u32,
    pub losses: u32,
    #[serde(rename = "elo")]
    pub rating: f64,
    pub hours_played: f64,
    /// Team this player was assigned to, if any
    pub team: Option<TeamId>,
    /// K-factor applied at the player's last match
    pub rating_adjustment: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a zero-initialized player record
    pub fn new(id: PlayerId, nickname: impl Into<String>, initial_rating: f64) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            wins: 0,
            losses: 0,
            rating: initial_rating,
            hours_played: 0.0,
            team: None,
            rating_adjustment: None,
            created_at: current_timestamp(),
        }
    }
}

/// A team of exactly `ROSTER_SIZE` players. The roster never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub team_name: String,
    pub players: [PlayerId; ROSTER_SIZE],
    pub created_at: DateTime<Utc>,
}

/// Team with its member records resolved, as returned to API callers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetails {
    pub id: TeamId,
    pub team_name: String,
    pub players: Vec<Player>,
    pub created_at: DateTime<Utc>,
}

/// A match result submitted for processing. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    /// Absent means the match was a draw
    pub winning_team_id: Option<TeamId>,
    /// Match length in hours
    pub duration: f64,
}

impl MatchReport {
    pub fn outcome(&self) -> MatchOutcome {
        match self.winning_team_id {
            Some(winner) if winner == self.team1_id => MatchOutcome::Team1Win,
            Some(_) => MatchOutcome::Team2Win,
            None => MatchOutcome::Draw,
        }
    }
}

/// Outcome of a match from the perspective of the first team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    Team1Win,
    Team2Win,
    Draw,
}

impl MatchOutcome {
    pub fn is_draw(self) -> bool {
        self == MatchOutcome::Draw
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::Team1Win => write!(f, "Team1Win"),
            MatchOutcome::Team2Win => write!(f, "Team2Win"),
            MatchOutcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Rating change applied to one player by a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub old_rating: f64,
    pub new_rating: f64,
    pub k_factor: f64,
    /// Realized match score: 1 win, 0 loss, 0.5 draw
    pub score: f64,
}

impl RatingChange {
    pub fn delta(&self) -> f64 {
        self.new_rating - self.old_rating
    }
}

/// Everything a processed match changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub outcome: MatchOutcome,
    /// Pre-match team ratings
    pub team1_rating: f64,
    pub team2_rating: f64,
    /// Expected scores derived from the pre-match team ratings
    pub team1_expected: f64,
    pub team2_expected: f64,
    pub duration: f64,
    pub changes: Vec<RatingChange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_serializes_with_wire_names() {
        let player = Player::new(Uuid::new_v4(), "ace", 0.0);
        let json = serde_json::to_value(&player).unwrap();

        assert_eq!(json["nickname"], "ace");
        assert_eq!(json["elo"], 0.0);
        assert_eq!(json["hoursPlayed"], 0.0);
        assert!(json["team"].is_null());
        assert!(json["ratingAdjustment"].is_null());
    }

    #[test]
    fn test_match_outcome_from_report() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut report = MatchReport {
            team1_id: a,
            team2_id: b,
            winning_team_id: Some(b),
            duration: 3.0,
        };
        assert_eq!(report.outcome(), MatchOutcome::Team2Win);

        report.winning_team_id = Some(a);
        assert_eq!(report.outcome(), MatchOutcome::Team1Win);

        report.winning_team_id = None;
        assert!(report.outcome().is_draw());
    }

    #[test]
    fn test_match_report_deserializes_without_winner() {
        let json = format!(
            r#"{{"team1Id":"{}","team2Id":"{}","duration":10}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let report: MatchReport = serde_json::from_str(&json).unwrap();
        assert!(report.winning_team_id.is_none());
        assert_eq!(report.duration, 10.0);
    }
}
