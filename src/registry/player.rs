//! Player registry
//!
//! Owns every player record. Nickname uniqueness is checked and the new
//! record inserted under one write lock, so two concurrent registrations
//! of the same nickname cannot both succeed.

use crate::error::{LadderError, Result};
use crate::types::{Player, PlayerId};
use crate::utils::generate_unique_id;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Player records keyed by id, remembering registration order
#[derive(Debug, Default)]
pub struct PlayerTable {
    by_id: HashMap<PlayerId, Player>,
    order: Vec<PlayerId>,
}

impl PlayerTable {
    pub fn get(&self, player_id: &PlayerId) -> Option<&Player> {
        self.by_id.get(player_id)
    }

    pub fn get_mut(&mut self, player_id: &PlayerId) -> Option<&mut Player> {
        self.by_id.get_mut(player_id)
    }

    pub fn contains(&self, player_id: &PlayerId) -> bool {
        self.by_id.contains_key(player_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    fn nickname_taken(&self, nickname: &str) -> bool {
        self.by_id.values().any(|player| player.nickname == nickname)
    }

    fn insert(&mut self, player: Player) {
        self.order.push(player.id);
        self.by_id.insert(player.id, player);
    }

    fn iter(&self) -> impl Iterator<Item = &Player> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    fn clear(&mut self) {
        self.by_id.clear();
        self.order.clear();
    }
}

/// In-memory player repository
#[derive(Debug)]
pub struct PlayerRegistry {
    players: RwLock<PlayerTable>,
    initial_rating: f64,
}

impl PlayerRegistry {
    /// Create an empty registry whose new players start at `initial_rating`
    pub fn new(initial_rating: f64) -> Self {
        Self {
            players: RwLock::new(PlayerTable::default()),
            initial_rating,
        }
    }

    /// Register a new player under a nickname nobody else holds
    pub fn create_player(&self, nickname: &str) -> Result<Player> {
        let mut players = self.write_table()?;

        if players.nickname_taken(nickname) {
            warn!("Rejected player registration - nickname '{}' already taken", nickname);
            return Err(LadderError::DuplicateNickname {
                nickname: nickname.to_string(),
            });
        }

        let id = generate_unique_id(|candidate| players.contains(candidate));
        let player = Player::new(id, nickname, self.initial_rating);
        players.insert(player.clone());

        info!(
            "Registered player '{}' ({}) - total players: {}",
            player.nickname,
            player.id,
            players.len()
        );
        Ok(player)
    }

    /// Fetch a single player
    pub fn get_player(&self, player_id: &PlayerId) -> Result<Player> {
        let players = self.read_table()?;
        players
            .get(player_id)
            .cloned()
            .ok_or_else(|| LadderError::PlayerNotFound {
                player_id: player_id.to_string(),
            })
    }

    /// All players in registration order
    pub fn list_players(&self) -> Result<Vec<Player>> {
        let players = self.read_table()?;
        Ok(players.iter().cloned().collect())
    }

    pub fn player_count(&self) -> Result<usize> {
        Ok(self.read_table()?.len())
    }

    /// Remove every player. Intended for test isolation.
    pub fn reset(&self) -> Result<()> {
        let mut players = self.write_table()?;
        debug!("Clearing {} players", players.len());
        players.clear();
        Ok(())
    }

    pub(crate) fn read_table(&self) -> Result<RwLockReadGuard<'_, PlayerTable>> {
        self.players
            .read()
            .map_err(|_| LadderError::lock_poisoned("players read"))
    }

    pub(crate) fn write_table(&self) -> Result<RwLockWriteGuard<'_, PlayerTable>> {
        self.players
            .write()
            .map_err(|_| LadderError::lock_poisoned("players write"))
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_create_player_zero_initialized() {
        let registry = PlayerRegistry::default();
        let player = registry.create_player("player1").unwrap();

        assert_eq!(player.nickname, "player1");
        assert_eq!(player.wins, 0);
        assert_eq!(player.losses, 0);
        assert_eq!(player.rating, 0.0);
        assert_eq!(player.hours_played, 0.0);
        assert!(player.team.is_none());
        assert!(player.rating_adjustment.is_none());
    }

    #[test]
    fn test_duplicate_nickname_rejected() {
        let registry = PlayerRegistry::default();
        registry.create_player("player1").unwrap();

        let result = registry.create_player("player1");
        assert_eq!(
            result,
            Err(LadderError::DuplicateNickname {
                nickname: "player1".to_string()
            })
        );
        assert_eq!(registry.player_count().unwrap(), 1);
    }

    #[test]
    fn test_distinct_nicknames_get_distinct_ids() {
        let registry = PlayerRegistry::default();
        let a = registry.create_player("alpha").unwrap();
        let b = registry.create_player("bravo").unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(registry.get_player(&a.id).unwrap().nickname, "alpha");
        assert_eq!(registry.get_player(&b.id).unwrap().nickname, "bravo");
    }

    #[test]
    fn test_get_unknown_player() {
        let registry = PlayerRegistry::default();
        let missing = Uuid::new_v4();

        assert!(matches!(
            registry.get_player(&missing),
            Err(LadderError::PlayerNotFound { .. })
        ));
    }

    #[test]
    fn test_list_players_keeps_registration_order() {
        let registry = PlayerRegistry::default();
        for i in 1..=10 {
            registry.create_player(&format!("player{}", i)).unwrap();
        }

        let nicknames: Vec<_> = registry
            .list_players()
            .unwrap()
            .into_iter()
            .map(|p| p.nickname)
            .collect();
        let expected: Vec<_> = (1..=10).map(|i| format!("player{}", i)).collect();
        assert_eq!(nicknames, expected);
    }

    #[test]
    fn test_initial_rating_is_configurable() {
        let registry = PlayerRegistry::new(1200.0);
        let player = registry.create_player("veteran").unwrap();
        assert_eq!(player.rating, 1200.0);
    }

    #[test]
    fn test_reset_clears_players() {
        let registry = PlayerRegistry::default();
        registry.create_player("player1").unwrap();
        registry.reset().unwrap();

        assert_eq!(registry.player_count().unwrap(), 0);
        assert!(registry.list_players().unwrap().is_empty());
        // Nickname is free again
        assert!(registry.create_player("player1").is_ok());
    }
}
