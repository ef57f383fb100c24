//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use squad_ladder::config::AppConfig;
use squad_ladder::service::AppState;
use squad_ladder::types::{MatchReport, PlayerId, TeamId};
use std::sync::Arc;

/// Fresh application state with default configuration
pub fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::new(AppConfig::default()).expect("default config is valid"))
}

/// Register `count` players named `{prefix}1..{prefix}{count}`
pub fn register_players(state: &AppState, prefix: &str, count: usize) -> Vec<PlayerId> {
    (1..=count)
        .map(|i| {
            state
                .create_player(&format!("{}{}", prefix, i))
                .expect("nickname is unique")
                .id
        })
        .collect()
}

/// Two full teams: `teamA = p1..p5`, `teamB = p6..p10`
pub struct TwoTeams {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub roster_a: Vec<PlayerId>,
    pub roster_b: Vec<PlayerId>,
}

pub fn create_two_teams(state: &AppState) -> TwoTeams {
    let ids = register_players(state, "p", 10);
    let team_a = state.create_team("teamA", &ids[..5]).expect("valid roster").id;
    let team_b = state.create_team("teamB", &ids[5..]).expect("valid roster").id;

    TwoTeams {
        team_a,
        team_b,
        roster_a: ids[..5].to_vec(),
        roster_b: ids[5..].to_vec(),
    }
}

pub fn match_report(
    team1_id: TeamId,
    team2_id: TeamId,
    winning_team_id: Option<TeamId>,
    duration: f64,
) -> MatchReport {
    MatchReport {
        team1_id,
        team2_id,
        winning_team_id,
        duration,
    }
}
