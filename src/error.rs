//! Error taxonomy shared by the game core and the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;

/// Failures reported by the storage collaborator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("join code {0} is already in use")]
    DuplicateCode(String),

    #[error("session {0} already exists")]
    DuplicateSession(String),

    #[error("player {0} already belongs to another session")]
    PlayerConflict(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while driving a session
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    /// Referenced session, join code or player does not exist
    #[error("{0}")]
    NotFound(String),

    /// Operation is not allowed in the current phase or turn
    #[error("{0}")]
    State(String),

    /// Malformed input
    #[error("{0}")]
    Validation(String),

    /// Host-only operation without the session's host token
    #[error("{0}")]
    Forbidden(String),

    /// Storage failure, surfaced unchanged
    #[error(transparent)]
    Connectivity(#[from] StoreError),
}

impl GameError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Stable outcome code clients can branch on
    pub fn code(&self) -> &'static str {
        match self {
            GameError::NotFound(_) => "NOT_FOUND",
            GameError::State(_) => "INVALID_STATE",
            GameError::Validation(_) => "VALIDATION",
            GameError::Forbidden(_) => "FORBIDDEN",
            GameError::Connectivity(_) => "CONNECTIVITY",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::State(_) => StatusCode::CONFLICT,
            GameError::Validation(_) => StatusCode::BAD_REQUEST,
            GameError::Forbidden(_) => StatusCode::FORBIDDEN,
            // the store answered, the request clashes with what it holds
            GameError::Connectivity(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            GameError::Connectivity(_) => StatusCode::CONFLICT,
        }
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub msg: String,
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            msg: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
