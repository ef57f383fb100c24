//! Service layer for the squad-ladder service
//!
//! This module contains the main application state and health reporting.

pub mod app;
pub mod health;

pub use app::{AppState, ServiceError};
pub use health::{HealthCheck, HealthStatus};
