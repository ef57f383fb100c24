//! Match processor
//!
//! Validates a reported match, then applies ELO updates to all ten
//! participating players. Both pre-match team ratings are captured before
//! any player record changes, and the teams read lock plus the players
//! write lock are held for the whole transaction. A rejected match leaves
//! every record untouched.

use crate::error::{LadderError, Result};
use crate::rating::{match_score, team_rating, RatingCalculator};
use crate::registry::{PlayerRegistry, PlayerTable, TeamRegistry, TeamTable};
use crate::types::{MatchReport, MatchSummary, Player, RatingChange, Team, ROSTER_SIZE};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Minimum accepted match duration, in hours
pub const MIN_MATCH_DURATION: f64 = 1.0;

/// Pre-match view of one side of a match
#[derive(Debug, Clone, Copy)]
struct SideSnapshot {
    rating: f64,
    expected: f64,
    /// `Some(true)` won, `Some(false)` lost, `None` drew
    won: Option<bool>,
}

/// Records match results against the player and team registries
#[derive(Clone)]
pub struct MatchProcessor {
    teams: Arc<TeamRegistry>,
    players: Arc<PlayerRegistry>,
    calculator: Arc<dyn RatingCalculator>,
}

impl MatchProcessor {
    pub fn new(
        teams: Arc<TeamRegistry>,
        players: Arc<PlayerRegistry>,
        calculator: Arc<dyn RatingCalculator>,
    ) -> Self {
        Self {
            teams,
            players,
            calculator,
        }
    }

    /// Validate and apply a match result
    pub fn record_match(&self, report: &MatchReport) -> Result<MatchSummary> {
        let teams = self.teams.read_table()?;

        let (team1, team2) = validate_report(&teams, report).inspect_err(|e| {
            warn!(
                "Rejected match {} vs {} - {}",
                report.team1_id, report.team2_id, e
            );
        })?;

        let mut players = self.players.write_table()?;

        for team in [team1, team2] {
            check_hours_headroom(&players, team, report.duration).inspect_err(|e| {
                warn!(
                    "Rejected match {} vs {} - {}",
                    report.team1_id, report.team2_id, e
                );
            })?;
        }

        // Snapshot both sides before touching any player
        let rating1 = roster_rating(&players, team1)?;
        let rating2 = roster_rating(&players, team2)?;
        let side1 = SideSnapshot {
            rating: rating1,
            expected: self.calculator.expected_score(rating1, rating2),
            won: report.winning_team_id.map(|winner| winner == team1.id),
        };
        let side2 = SideSnapshot {
            rating: rating2,
            expected: self.calculator.expected_score(rating2, rating1),
            won: report.winning_team_id.map(|winner| winner == team2.id),
        };

        debug!(
            "Match snapshot - {}: rating {:.2} expected {:.3}; {}: rating {:.2} expected {:.3}",
            team1.team_name, side1.rating, side1.expected, team2.team_name, side2.rating, side2.expected
        );

        let mut changes = Vec::with_capacity(ROSTER_SIZE * 2);
        for (team, side) in [(team1, side1), (team2, side2)] {
            for player_id in &team.players {
                let player = players
                    .get_mut(player_id)
                    .ok_or_else(|| LadderError::InternalError {
                        message: format!("Roster player {} vanished mid-match", player_id),
                    })?;
                changes.push(self.apply_result(player, team, side, report.duration));
            }
        }

        let summary = MatchSummary {
            team1_id: team1.id,
            team2_id: team2.id,
            outcome: report.outcome(),
            team1_rating: side1.rating,
            team2_rating: side2.rating,
            team1_expected: side1.expected,
            team2_expected: side2.expected,
            duration: report.duration,
            changes,
        };

        info!(
            "Recorded match '{}' vs '{}' - outcome: {}, duration: {}h",
            team1.team_name, team2.team_name, summary.outcome, summary.duration
        );
        Ok(summary)
    }

    /// Update one player: hours, then win/loss, then K tier, then rating
    fn apply_result(
        &self,
        player: &mut Player,
        team: &Team,
        side: SideSnapshot,
        duration: f64,
    ) -> RatingChange {
        player.hours_played += duration;
        match side.won {
            Some(true) => player.wins += 1,
            Some(false) => player.losses += 1,
            None => {}
        }

        let k_factor = self.calculator.k_factor(player.hours_played);
        player.rating_adjustment = Some(k_factor);

        let score = match_score(side.won);
        let old_rating = player.rating;
        player.rating = self
            .calculator
            .updated_rating(old_rating, k_factor, score, side.expected);

        RatingChange {
            player_id: player.id,
            team_id: team.id,
            old_rating,
            new_rating: player.rating,
            k_factor,
            score,
        }
    }
}

/// Check a report against the registered teams. Checks run in a fixed order
/// and stop at the first failure.
fn validate_report<'a>(
    teams: &'a TeamTable,
    report: &MatchReport,
) -> Result<(&'a Team, &'a Team)> {
    if report.team1_id == report.team2_id {
        return Err(LadderError::invalid_match("a team cannot play against itself"));
    }

    let team1 = teams.get(&report.team1_id).ok_or_else(|| {
        LadderError::invalid_match(format!("team {} does not exist", report.team1_id))
    })?;
    let team2 = teams.get(&report.team2_id).ok_or_else(|| {
        LadderError::invalid_match(format!("team {} does not exist", report.team2_id))
    })?;

    if let Some(winner) = report.winning_team_id {
        if !teams.contains_key(&winner) {
            return Err(LadderError::invalid_match(format!(
                "winning team {} does not exist",
                winner
            )));
        }
        if winner != team1.id && winner != team2.id {
            return Err(LadderError::invalid_match(format!(
                "winning team {} did not play in this match",
                winner
            )));
        }
    }

    // Also rejects NaN
    if !(report.duration >= MIN_MATCH_DURATION) || !report.duration.is_finite() {
        return Err(LadderError::invalid_match(format!(
            "duration must be at least {}, got {}",
            MIN_MATCH_DURATION, report.duration
        )));
    }

    Ok((team1, team2))
}

/// Reject a duration that would push any member's hours played out of the
/// finite range
fn check_hours_headroom(players: &PlayerTable, team: &Team, duration: f64) -> Result<()> {
    for player_id in &team.players {
        let player = players.get(player_id).ok_or_else(|| LadderError::InternalError {
            message: format!("Team {} references unknown player {}", team.id, player_id),
        })?;
        if !(player.hours_played + duration).is_finite() {
            return Err(LadderError::invalid_match(format!(
                "duration {} would overflow hours played for player {}",
                duration, player_id
            )));
        }
    }
    Ok(())
}

/// Pre-match team rating from current member ratings
fn roster_rating(players: &PlayerTable, team: &Team) -> Result<f64> {
    let mut ratings = [0.0; ROSTER_SIZE];
    for (slot, player_id) in ratings.iter_mut().zip(team.players.iter()) {
        *slot = players
            .get(player_id)
            .map(|player| player.rating)
            .ok_or_else(|| LadderError::InternalError {
                message: format!(
                    "Team {} references unknown player {}",
                    team.id, player_id
                ),
            })?;
    }
    Ok(team_rating(&ratings))
}
