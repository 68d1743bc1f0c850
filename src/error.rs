use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing::{error, warn};

use crate::client::ClientError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Remote error: {0}")]
    Remote(#[from] ClientError),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    InternalServerError,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unauthorized(msg) => {
                warn!("rejected admin request: {}", msg);
                (StatusCode::UNAUTHORIZED, msg)
            }
            AppError::Database(e) => database_status(e),
            AppError::Remote(e) => {
                error!("remote error: {}", e);
                (StatusCode::BAD_GATEWAY, "Upstream request failed".to_string())
            }
            AppError::Migration(e) => {
                error!("migration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
            AppError::Config(msg) => {
                error!("configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}

fn database_status(e: sqlx::Error) -> (StatusCode, String) {
    if let Some(db_err) = e.as_database_error() {
        match db_err.kind() {
            ErrorKind::UniqueViolation => {
                return (StatusCode::CONFLICT, "Record already exists".to_string());
            }
            ErrorKind::ForeignKeyViolation => {
                return (
                    StatusCode::BAD_REQUEST,
                    "Referenced record does not exist".to_string(),
                );
            }
            ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                return (StatusCode::BAD_REQUEST, db_err.message().to_string());
            }
            _ => {}
        }
    }

    error!("database error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Database error occurred".to_string(),
    )
}
