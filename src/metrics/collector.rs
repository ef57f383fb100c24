//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the squad-ladder service
//! using Prometheus metrics.

use crate::error::LadderError;
use crate::types::MatchOutcome;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the ladder service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Player and team registry metrics
    registry_metrics: RegistryMetrics,

    /// Match processing metrics
    match_metrics: MatchMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,

    /// Rejected operations by operation and reason
    pub rejections_total: IntCounterVec,
}

/// Player and team registry metrics
#[derive(Clone)]
pub struct RegistryMetrics {
    pub players_created_total: IntCounter,
    pub teams_created_total: IntCounter,
    pub players_registered: IntGauge,
    pub teams_registered: IntGauge,
}

/// Match processing metrics
#[derive(Clone)]
pub struct MatchMetrics {
    /// Accepted matches by outcome (decisive, draw)
    pub matches_recorded_total: IntCounterVec,

    /// Time spent validating and applying a match
    pub match_processing_duration: Histogram,

    /// Hours played per accepted match
    pub match_duration_hours: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let registry_metrics = RegistryMetrics::new(&registry)?;
        let match_metrics = MatchMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            registry_metrics,
            match_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    pub fn registries(&self) -> &RegistryMetrics {
        &self.registry_metrics
    }

    pub fn matches(&self) -> &MatchMetrics {
        &self.match_metrics
    }

    pub fn record_player_created(&self, total_players: usize) {
        self.registry_metrics.players_created_total.inc();
        self.registry_metrics
            .players_registered
            .set(total_players as i64);
    }

    pub fn record_team_created(&self, total_teams: usize) {
        self.registry_metrics.teams_created_total.inc();
        self.registry_metrics.teams_registered.set(total_teams as i64);
    }

    /// Record an accepted match
    pub fn record_match(&self, outcome: MatchOutcome, hours: f64, duration: Duration) {
        let label = if outcome.is_draw() { "draw" } else { "decisive" };
        self.match_metrics
            .matches_recorded_total
            .with_label_values(&[label])
            .inc();
        self.match_metrics
            .match_processing_duration
            .observe(duration.as_secs_f64());
        self.match_metrics.match_duration_hours.observe(hours);
    }

    /// Record a rejected operation
    pub fn record_rejection(&self, operation: &str, error: &LadderError) {
        self.service_metrics
            .rejections_total
            .with_label_values(&[operation, error.kind()])
            .inc();
    }

    /// Reset the registry gauges after a store reset
    pub fn record_reset(&self) {
        self.registry_metrics.players_registered.set(0);
        self.registry_metrics.teams_registered.set(0);
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let health_status = IntGauge::new(
            "squad_ladder_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("squad_ladder_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        let rejections_total = IntCounterVec::new(
            Opts::new(
                "squad_ladder_rejections_total",
                "Rejected operations by operation and reason",
            ),
            &["operation", "reason"],
        )?;
        registry.register(Box::new(rejections_total.clone()))?;

        Ok(Self {
            health_status,
            component_health,
            rejections_total,
        })
    }
}

impl RegistryMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let players_created_total = IntCounter::new(
            "squad_ladder_players_created_total",
            "Total players registered",
        )?;
        registry.register(Box::new(players_created_total.clone()))?;

        let teams_created_total =
            IntCounter::new("squad_ladder_teams_created_total", "Total teams formed")?;
        registry.register(Box::new(teams_created_total.clone()))?;

        let players_registered = IntGauge::new(
            "squad_ladder_players_registered",
            "Players currently held in memory",
        )?;
        registry.register(Box::new(players_registered.clone()))?;

        let teams_registered = IntGauge::new(
            "squad_ladder_teams_registered",
            "Teams currently held in memory",
        )?;
        registry.register(Box::new(teams_registered.clone()))?;

        Ok(Self {
            players_created_total,
            teams_created_total,
            players_registered,
            teams_registered,
        })
    }
}

impl MatchMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let matches_recorded_total = IntCounterVec::new(
            Opts::new(
                "squad_ladder_matches_recorded_total",
                "Total matches accepted",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(matches_recorded_total.clone()))?;

        let match_processing_duration = Histogram::with_opts(
            HistogramOpts::new(
                "squad_ladder_match_processing_duration_seconds",
                "Match validation and rating update time",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.01, 0.05, 0.1]),
        )?;
        registry.register(Box::new(match_processing_duration.clone()))?;

        let match_duration_hours = Histogram::with_opts(
            HistogramOpts::new(
                "squad_ladder_match_duration_hours",
                "Reported match duration in hours",
            )
            .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        )?;
        registry.register(Box::new(match_duration_hours.clone()))?;

        Ok(Self {
            matches_recorded_total,
            match_processing_duration,
            match_duration_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        let _service = collector.service();
        let _registries = collector.registries();
        let _matches = collector.matches();
    }

    #[test]
    fn test_registry_counters() {
        let collector = MetricsCollector::new().unwrap();

        collector.record_player_created(1);
        collector.record_player_created(2);
        collector.record_team_created(1);

        assert_eq!(collector.registries().players_created_total.get(), 2);
        assert_eq!(collector.registries().players_registered.get(), 2);
        assert_eq!(collector.registries().teams_registered.get(), 1);

        collector.record_reset();
        assert_eq!(collector.registries().players_registered.get(), 0);
        assert_eq!(collector.registries().players_created_total.get(), 2);
    }

    #[test]
    fn test_match_and_rejection_recording() {
        let collector = MetricsCollector::new().unwrap();

        collector.record_match(MatchOutcome::Draw, 10.0, Duration::from_micros(40));
        collector.record_match(MatchOutcome::Team1Win, 3.0, Duration::from_micros(40));
        collector.record_rejection(
            "record_match",
            &LadderError::InvalidMatch {
                reason: "same team".to_string(),
            },
        );

        let matches = &collector.matches().matches_recorded_total;
        assert_eq!(matches.with_label_values(&["draw"]).get(), 1);
        assert_eq!(matches.with_label_values(&["decisive"]).get(), 1);
        assert_eq!(
            collector
                .service()
                .rejections_total
                .with_label_values(&["record_match", "invalid_match"])
                .get(),
            1
        );
    }

    #[test]
    fn test_metrics_timer() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");
        let timer = collector.start_timer();

        std::thread::sleep(Duration::from_millis(10));
        let duration = timer.elapsed();

        assert!(duration >= Duration::from_millis(10));

        let final_duration = timer.stop();
        assert!(final_duration >= Duration::from_millis(10));
    }
}
