//! Error types for the ladder service
//!
//! Registry and match operations report rejections through `LadderError`.
//! Binary-level plumbing (config loading, server startup) uses anyhow.

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, LadderError>;

/// Rejection reasons for ladder operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LadderError {
    #[error("Nickname already taken: {nickname}")]
    DuplicateNickname { nickname: String },

    #[error("Team name already taken: {name}")]
    DuplicateTeamName { name: String },

    #[error("Invalid roster: {reason}")]
    InvalidRoster { reason: String },

    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("Malformed request: {reason}")]
    MalformedRequest { reason: String },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Team not found: {team_id}")]
    TeamNotFound { team_id: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

impl LadderError {
    pub(crate) fn invalid_roster(reason: impl Into<String>) -> Self {
        LadderError::InvalidRoster {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_match(reason: impl Into<String>) -> Self {
        LadderError::InvalidMatch {
            reason: reason.into(),
        }
    }

    pub(crate) fn lock_poisoned(what: &str) -> Self {
        LadderError::InternalError {
            message: format!("Failed to acquire {} lock", what),
        }
    }

    /// Short machine-readable label, used as a metrics label value
    pub fn kind(&self) -> &'static str {
        match self {
            LadderError::DuplicateNickname { .. } => "duplicate_nickname",
            LadderError::DuplicateTeamName { .. } => "duplicate_team_name",
            LadderError::InvalidRoster { .. } => "invalid_roster",
            LadderError::InvalidMatch { .. } => "invalid_match",
            LadderError::MalformedRequest { .. } => "malformed_request",
            LadderError::PlayerNotFound { .. } => "player_not_found",
            LadderError::TeamNotFound { .. } => "team_not_found",
            LadderError::ConfigurationError { .. } => "configuration",
            LadderError::InternalError { .. } => "internal",
        }
    }

    /// HTTP status code for this rejection
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            LadderError::PlayerNotFound { .. } | LadderError::TeamNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            LadderError::DuplicateNickname { .. }
            | LadderError::DuplicateTeamName { .. }
            | LadderError::InvalidRoster { .. }
            | LadderError::InvalidMatch { .. }
            | LadderError::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            LadderError::ConfigurationError { .. } | LadderError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
