//! Main application state and service coordination
//!
//! `AppState` is built once at startup. It owns the registries and the match
//! processor and is handed to the HTTP layer behind an `Arc`. Each public
//! operation records metrics for both accepted and rejected calls.

use crate::config::AppConfig;
use crate::error::{LadderError, Result as LadderResult};
use crate::matches::MatchProcessor;
use crate::metrics::MetricsCollector;
use crate::rating::{EloRatingCalculator, RatingCalculator};
use crate::registry::{PlayerRegistry, TeamRegistry};
use crate::types::{MatchReport, MatchSummary, Player, PlayerId, TeamDetails, TeamId};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },
}

/// Shared application state
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Player repository
    players: Arc<PlayerRegistry>,

    /// Team repository
    teams: Arc<TeamRegistry>,

    /// Match ingestion
    matches: MatchProcessor,

    /// Prometheus metrics
    metrics: Arc<MetricsCollector>,

    /// Service status
    is_running: Arc<RwLock<bool>>,
}

impl AppState {
    /// Initialize the application with all dependencies
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing {} service", config.service.name);

        let calculator = EloRatingCalculator::new(config.rating.clone()).map_err(|e| {
            ServiceError::Configuration {
                message: e.to_string(),
            }
        })?;
        debug!("Rating configuration: {}", calculator.config());

        let metrics = MetricsCollector::new().map_err(|e| ServiceError::Initialization {
            message: format!("Failed to create metrics collector: {}", e),
        })?;

        let players = Arc::new(PlayerRegistry::new(calculator.initial_rating()));
        let teams = Arc::new(TeamRegistry::new(players.clone()));
        let matches = MatchProcessor::new(teams.clone(), players.clone(), Arc::new(calculator));

        Ok(Self {
            config,
            players,
            teams,
            matches,
            metrics: Arc::new(metrics),
            is_running: Arc::new(RwLock::new(false)),
        })
    }

    /// Mark the service as accepting requests
    pub async fn start(&self) {
        *self.is_running.write().await = true;
        info!("✅ {} service started", self.config.service.name);
    }

    /// Mark the service as shutting down
    pub async fn shutdown(&self) {
        *self.is_running.write().await = false;

        let players = self.players.player_count().unwrap_or_default();
        let teams = self.teams.team_count().unwrap_or_default();
        info!(
            "Final service statistics: {} players, {} teams (discarded on exit)",
            players, teams
        );
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    pub fn players(&self) -> Arc<PlayerRegistry> {
        self.players.clone()
    }

    pub fn teams(&self) -> Arc<TeamRegistry> {
        self.teams.clone()
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    pub fn create_player(&self, nickname: &str) -> LadderResult<Player> {
        let result = self.players.create_player(nickname);
        match &result {
            Ok(_) => self
                .metrics
                .record_player_created(self.players.player_count()?),
            Err(e) => self.metrics.record_rejection("create_player", e),
        }
        result
    }

    pub fn get_player(&self, player_id: &PlayerId) -> LadderResult<Player> {
        self.players.get_player(player_id)
    }

    pub fn list_players(&self) -> LadderResult<Vec<Player>> {
        self.players.list_players()
    }

    /// Form a team and return it with its members resolved
    pub fn create_team(&self, team_name: &str, member_ids: &[PlayerId]) -> LadderResult<TeamDetails> {
        let team = self
            .teams
            .create_team(team_name, member_ids)
            .inspect_err(|e| self.metrics.record_rejection("create_team", e))?;
        self.metrics.record_team_created(self.teams.team_count()?);
        self.teams.get_team_details(&team.id)
    }

    pub fn get_team(&self, team_id: &TeamId) -> LadderResult<TeamDetails> {
        self.teams.get_team_details(team_id)
    }

    pub fn record_match(&self, report: &MatchReport) -> LadderResult<MatchSummary> {
        let timer = self.metrics.start_timer();
        let summary = self
            .matches
            .record_match(report)
            .inspect_err(|e| self.metrics.record_rejection("record_match", e))?;
        self.metrics
            .record_match(summary.outcome, summary.duration, timer.stop());
        Ok(summary)
    }

    /// Record a rejection raised before reaching a registry, such as an
    /// unparseable id
    pub fn reject(&self, operation: &str, error: LadderError) -> LadderError {
        self.metrics.record_rejection(operation, &error);
        error
    }

    /// Clear every team and player. Intended for test isolation.
    pub fn reset(&self) -> LadderResult<()> {
        self.teams.reset()?;
        self.players.reset()?;
        self.metrics.record_reset();
        info!("Cleared all players and teams");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_state() -> AppState {
        AppState::new(AppConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_running_flag() {
        let state = create_state();
        assert!(!state.is_running().await);

        state.start().await;
        assert!(state.is_running().await);

        state.shutdown().await;
        assert!(!state.is_running().await);
    }

    #[test]
    fn test_invalid_rating_config_rejected() {
        let mut config = AppConfig::default();
        config.rating.fallback_k = 0.0;
        assert!(matches!(
            AppState::new(config),
            Err(ServiceError::Configuration { .. })
        ));
    }

    #[test]
    fn test_operations_record_metrics() {
        let state = create_state();
        let ids: Vec<_> = (1..=10)
            .map(|i| state.create_player(&format!("p{}", i)).unwrap().id)
            .collect();
        assert!(state.create_player("p1").is_err());

        let a = state.create_team("A", &ids[..5]).unwrap();
        let b = state.create_team("B", &ids[5..]).unwrap();
        assert_eq!(a.players.len(), 5);

        state
            .record_match(&MatchReport {
                team1_id: a.id,
                team2_id: b.id,
                winning_team_id: None,
                duration: 2.0,
            })
            .unwrap();

        let metrics = state.metrics();
        assert_eq!(metrics.registries().players_registered.get(), 10);
        assert_eq!(metrics.registries().teams_registered.get(), 2);
        assert_eq!(
            metrics
                .matches()
                .matches_recorded_total
                .with_label_values(&["draw"])
                .get(),
            1
        );
        assert_eq!(
            metrics
                .service()
                .rejections_total
                .with_label_values(&["create_player", "duplicate_nickname"])
                .get(),
            1
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let state = create_state();
        let ids: Vec<_> = (1..=5)
            .map(|i| state.create_player(&format!("p{}", i)).unwrap().id)
            .collect();
        state.create_team("A", &ids).unwrap();

        state.reset().unwrap();
        assert!(state.list_players().unwrap().is_empty());
        assert_eq!(state.teams().team_count().unwrap(), 0);
    }
}
