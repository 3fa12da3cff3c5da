//! Error types for Haletix server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes reported to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    StorageFailure = 2,
    NoSuchRecord = 3,
    BadValue = 4,
    CapacityExceeded = 5,
    SeatTaken = 6,
    InvalidTransition = 7,
    ImportFailure = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Only {available} tickets available")]
    Capacity { requested: u32, available: i64 },

    #[error("Seat {0} is already taken")]
    SeatTaken(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchRecord, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Capacity { requested, available } => {
                tracing::debug!("Refused {} tickets with {} remaining", requested, available);
                (StatusCode::CONFLICT, ErrorCode::CapacityExceeded, self.to_string())
            }
            AppError::SeatTaken(_) => {
                (StatusCode::CONFLICT, ErrorCode::SeatTaken, self.to_string())
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::InvalidTransition, msg.clone())
            }
            AppError::Import(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ImportFailure, msg.clone())
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageFailure,
                    "Storage error".to_string(),
                )
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageFailure,
                    "Storage error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
