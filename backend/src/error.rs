use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::game::LayoutError;

/// Failures surfaced by the game session manager
#[derive(Debug, Error)]
pub enum GameError {
    #[error("game {0} not found")]
    GameNotFound(Uuid),
    #[error("player {0} not found")]
    PlayerNotFound(Uuid),
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("unable to place fleet after {attempts} layout attempts")]
    PlacementFailed { attempts: usize },
    #[error("invalid battlefield layout: {0}")]
    Layout(#[from] LayoutError),
}

impl GameError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GameError::GameNotFound(_) | GameError::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            GameError::Validation(_) => StatusCode::BAD_REQUEST,
            GameError::PlacementFailed { .. } | GameError::Layout(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
