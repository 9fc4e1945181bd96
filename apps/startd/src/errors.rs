use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::TileId;

/// Errors raised by the tile engine and the directory scans that feed it.
#[derive(Debug, Error)]
pub enum TileError {
    /// A size name that does not parse, or a span the grid cannot hold.
    #[error("Invalid size class: {0}")]
    InvalidSizeClass(String),

    #[error("Unknown tile: {0}")]
    UnknownTile(TileId),

    #[error("No drag in progress for tile {0}")]
    DragNotStarted(TileId),

    /// Directory enumeration failed. Not retried.
    #[error("Source directory unavailable: {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Tile(#[from] TileError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Launch failed: {0}")]
    Launch(String),

    #[error("Pin operation failed: {0}")]
    Pin(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Tile(e @ TileError::InvalidSizeClass(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_SIZE_CLASS", e.to_string())
            }
            AppError::Tile(e @ TileError::UnknownTile(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_TILE", e.to_string())
            }
            AppError::Tile(e @ TileError::DragNotStarted(_)) => {
                (StatusCode::CONFLICT, "DRAG_NOT_STARTED", e.to_string())
            }
            AppError::Tile(e @ TileError::SourceUnavailable { .. }) => {
                tracing::error!("Source error: {e:?}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SOURCE_UNAVAILABLE",
                    e.to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Launch(msg) => {
                tracing::error!("Launch error: {msg}");
                (StatusCode::BAD_GATEWAY, "LAUNCH_FAILED", msg.clone())
            }
            AppError::Pin(msg) => {
                tracing::error!("Pin error: {msg}");
                (StatusCode::BAD_GATEWAY, "PIN_FAILED", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_status_codes_for_tile_errors() {
        let id = TileId::for_path(Path::new("x.lnk"));
        let cases = vec![
            (
                AppError::from(TileError::InvalidSizeClass("huge".into())),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::from(TileError::UnknownTile(id)), StatusCode::NOT_FOUND),
            (AppError::from(TileError::DragNotStarted(id)), StatusCode::CONFLICT),
            (
                AppError::from(TileError::SourceUnavailable {
                    path: PathBuf::from("missing"),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::Launch("boom".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
