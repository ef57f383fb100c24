//! Metrics and monitoring for the squad-ladder service
//!
//! Prometheus counters for registrations, accepted matches and rejections.
//! The `/metrics` endpoint itself is mounted by the API router.

pub mod collector;

pub use collector::{MatchMetrics, MetricsCollector, MetricsTimer, RegistryMetrics, ServiceMetrics};
