//! Request handlers for the ladder HTTP API

use crate::error::LadderError;
use crate::service::{AppState, HealthCheck, HealthStatus};
use crate::types::{MatchReport, Player, PlayerId, TeamDetails};
use crate::utils::parse_id;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, TextEncoder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub team_name: String,
    pub players: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMatchRequest {
    pub team1_id: String,
    pub team2_id: String,
    #[serde(default)]
    pub winning_team_id: Option<String>,
    pub duration: f64,
}

impl RecordMatchRequest {
    /// Turn raw ids into a report. Ids that are not valid UUIDs cannot name
    /// a registered team, so they reject the match the same way.
    pub fn into_report(self) -> Result<MatchReport, LadderError> {
        if self.team1_id == self.team2_id {
            return Err(LadderError::invalid_match("a team cannot play against itself"));
        }

        let unknown = |raw: &str| LadderError::invalid_match(format!("team {} does not exist", raw));
        let team1_id = parse_id(&self.team1_id).ok_or_else(|| unknown(&self.team1_id))?;
        let team2_id = parse_id(&self.team2_id).ok_or_else(|| unknown(&self.team2_id))?;

        // An empty winner counts as a draw
        let winning_team_id = match self.winning_team_id.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_id(raw).ok_or_else(|| {
                LadderError::invalid_match(format!("winning team {} does not exist", raw))
            })?),
        };

        Ok(MatchReport {
            team1_id,
            team2_id,
            winning_team_id,
            duration: self.duration,
        })
    }
}

impl IntoResponse for LadderError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Unwrap a JSON body, turning an unreadable or mistyped body into a 400
/// rejection recorded against `operation`
fn json_body<T: DeserializeOwned>(
    state: &AppState,
    operation: &str,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, LadderError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!("Malformed {} body: {}", operation, rejection.body_text());
        state.reject(
            operation,
            LadderError::MalformedRequest {
                reason: rejection.body_text(),
            },
        )
    })
}

/// Root endpoint handler - shows service information
pub async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "service": state.config().service.name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/players",
            "/players/create",
            "/teams",
            "/matches",
            "/health",
            "/ready",
            "/alive",
            "/metrics"
        ]
    }))
}

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> Result<Json<Player>, LadderError> {
    let request = json_body(&state, "create_player", payload)?;
    state.create_player(&request.nickname).map(Json)
}

pub async fn list_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Player>>, LadderError> {
    state.list_players().map(Json)
}

pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Player>, LadderError> {
    let player_id = parse_id(&raw_id).ok_or(LadderError::PlayerNotFound {
        player_id: raw_id.clone(),
    })?;
    state.get_player(&player_id).map(Json)
}

pub async fn create_team(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> Result<Json<TeamDetails>, LadderError> {
    let request = json_body(&state, "create_team", payload)?;
    let member_ids = request
        .players
        .iter()
        .map(|raw| {
            parse_id(raw).ok_or_else(|| {
                LadderError::invalid_roster(format!("player {} does not exist", raw))
            })
        })
        .collect::<Result<Vec<PlayerId>, _>>()
        .map_err(|e| state.reject("create_team", e))?;

    state.create_team(&request.team_name, &member_ids).map(Json)
}

pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<TeamDetails>, LadderError> {
    let team_id = parse_id(&raw_id).ok_or(LadderError::TeamNotFound {
        team_id: raw_id.clone(),
    })?;
    state.get_team(&team_id).map(Json)
}

/// Accepted matches answer with an empty 200
pub async fn record_match(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecordMatchRequest>, JsonRejection>,
) -> Result<StatusCode, LadderError> {
    let report = json_body(&state, "record_match", payload)?
        .into_report()
        .map_err(|e| state.reject("record_match", e))?;
    state.record_match(&report)?;
    Ok(StatusCode::OK)
}

/// Full health report
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Health check requested");

    match HealthCheck::check(state).await {
        Ok(health) => {
            let status = match health.status {
                HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::OK,
            };
            (status, Json(json!(health)))
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "error": e.to_string() })),
            )
        }
    }
}

/// Readiness check endpoint handler
pub async fn ready_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Readiness check requested");

    match HealthCheck::readiness_check(state).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Ready"),
        Ok(HealthStatus::Degraded) => (StatusCode::OK, "Degraded but ready"),
        Ok(HealthStatus::Unhealthy) => (StatusCode::SERVICE_UNAVAILABLE, "Not ready"),
        Err(e) => {
            error!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Not ready")
        }
    }
}

/// Liveness check endpoint handler
pub async fn alive_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match HealthCheck::liveness_check(state).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Alive"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "Not alive"),
    }
}

/// Prometheus metrics endpoint handler
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let registry = state.metrics().registry();
    let metric_families = registry.gather();
    let encoder = TextEncoder::new();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            buffer,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics",
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn request(team1: &str, team2: &str, winner: Option<&str>) -> RecordMatchRequest {
        RecordMatchRequest {
            team1_id: team1.to_string(),
            team2_id: team2.to_string(),
            winning_team_id: winner.map(str::to_string),
            duration: 10.0,
        }
    }

    #[test]
    fn test_into_report_rejects_same_ids_first() {
        let result = request("wrong id", "wrong id", Some("wrong id")).into_report();
        assert!(matches!(result, Err(LadderError::InvalidMatch { .. })));
    }

    #[test]
    fn test_into_report_rejects_malformed_ids() {
        let valid = Uuid::new_v4().to_string();
        assert!(request("nope", &valid, None).into_report().is_err());
        assert!(request(&valid, "nope", None).into_report().is_err());

        let other = Uuid::new_v4().to_string();
        assert!(request(&valid, &other, Some("nope")).into_report().is_err());
    }

    #[test]
    fn test_into_report_empty_winner_is_draw() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let report = request(&a.to_string(), &b.to_string(), Some(""))
            .into_report()
            .unwrap();
        assert_eq!(report.team1_id, a);
        assert!(report.winning_team_id.is_none());
    }
}
