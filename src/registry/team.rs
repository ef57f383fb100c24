//! Team registry
//!
//! Teams are formed once from exactly `ROSTER_SIZE` distinct players who
//! do not yet belong to a team. Creating a team holds the teams lock and
//! then the players lock for the whole validate-assign-insert sequence.
//! Every caller that needs both locks takes them in that order.

use crate::error::{LadderError, Result};
use crate::registry::player::{PlayerRegistry, PlayerTable};
use crate::types::{PlayerId, Team, TeamDetails, TeamId, ROSTER_SIZE};
use crate::utils::{current_timestamp, generate_unique_id};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

/// Team records keyed by id
pub type TeamTable = HashMap<TeamId, Team>;

/// In-memory team repository
#[derive(Debug)]
pub struct TeamRegistry {
    teams: RwLock<TeamTable>,
    players: Arc<PlayerRegistry>,
}

impl TeamRegistry {
    pub fn new(players: Arc<PlayerRegistry>) -> Self {
        Self {
            teams: RwLock::new(HashMap::new()),
            players,
        }
    }

    /// Form a new team and attach each member to it
    pub fn create_team(&self, team_name: &str, member_ids: &[PlayerId]) -> Result<Team> {
        let mut teams = self
            .teams
            .write()
            .map_err(|_| LadderError::lock_poisoned("teams write"))?;
        let mut players = self.players.write_table()?;

        if teams.values().any(|team| team.team_name == team_name) {
            warn!("Rejected team '{}' - name already taken", team_name);
            return Err(LadderError::DuplicateTeamName {
                name: team_name.to_string(),
            });
        }

        let roster = validate_roster(&players, member_ids).inspect_err(|e| {
            warn!("Rejected team '{}' - {}", team_name, e);
        })?;

        let team = Team {
            id: generate_unique_id(|candidate| teams.contains_key(candidate)),
            team_name: team_name.to_string(),
            players: roster,
            created_at: current_timestamp(),
        };

        for player_id in &team.players {
            let player = players
                .get_mut(player_id)
                .ok_or_else(|| LadderError::InternalError {
                    message: format!("Validated player {} vanished", player_id),
                })?;
            player.team = Some(team.id);
        }
        teams.insert(team.id, team.clone());

        info!(
            "Created team '{}' ({}) - total teams: {}",
            team.team_name,
            team.id,
            teams.len()
        );
        Ok(team)
    }

    /// Fetch a team record
    pub fn get_team(&self, team_id: &TeamId) -> Result<Team> {
        let teams = self.read_table()?;
        teams
            .get(team_id)
            .cloned()
            .ok_or_else(|| LadderError::TeamNotFound {
                team_id: team_id.to_string(),
            })
    }

    /// Fetch a team with its member records resolved
    pub fn get_team_details(&self, team_id: &TeamId) -> Result<TeamDetails> {
        let teams = self.read_table()?;
        let team = teams.get(team_id).ok_or_else(|| LadderError::TeamNotFound {
            team_id: team_id.to_string(),
        })?;

        let players = self.players.read_table()?;
        let members = team
            .players
            .iter()
            .map(|player_id| {
                players
                    .get(player_id)
                    .cloned()
                    .ok_or_else(|| LadderError::InternalError {
                        message: format!("Team {} references unknown player {}", team.id, player_id),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TeamDetails {
            id: team.id,
            team_name: team.team_name.clone(),
            players: members,
            created_at: team.created_at,
        })
    }

    pub fn team_count(&self) -> Result<usize> {
        Ok(self.read_table()?.len())
    }

    /// Remove every team. Intended for test isolation; players keep their
    /// team back-reference, so callers reset the player registry as well.
    pub fn reset(&self) -> Result<()> {
        let mut teams = self
            .teams
            .write()
            .map_err(|_| LadderError::lock_poisoned("teams write"))?;
        debug!("Clearing {} teams", teams.len());
        teams.clear();
        Ok(())
    }

    pub(crate) fn read_table(&self) -> Result<RwLockReadGuard<'_, TeamTable>> {
        self.teams
            .read()
            .map_err(|_| LadderError::lock_poisoned("teams read"))
    }
}

/// Check that `member_ids` names exactly `ROSTER_SIZE` distinct, existing,
/// unattached players
fn validate_roster(players: &PlayerTable, member_ids: &[PlayerId]) -> Result<[PlayerId; ROSTER_SIZE]> {
    let roster: [PlayerId; ROSTER_SIZE] = member_ids.try_into().map_err(|_| {
        LadderError::invalid_roster(format!(
            "expected {} players, got {}",
            ROSTER_SIZE,
            member_ids.len()
        ))
    })?;

    let mut seen = HashSet::with_capacity(ROSTER_SIZE);
    for player_id in &roster {
        if !seen.insert(*player_id) {
            return Err(LadderError::invalid_roster(format!(
                "player {} listed more than once",
                player_id
            )));
        }

        let player = players.get(player_id).ok_or_else(|| {
            LadderError::invalid_roster(format!("player {} does not exist", player_id))
        })?;

        if let Some(team_id) = player.team {
            return Err(LadderError::invalid_roster(format!(
                "player {} already belongs to team {}",
                player_id, team_id
            )));
        }
    }

    Ok(roster)
}
