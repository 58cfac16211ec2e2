//! Error types for Slotbook server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    InvalidFormat = 4,
    InvalidArgument = 5,
    InvalidRange = 6,
    InvalidInterval = 7,
    NoSuchVenue = 8,
    NoSuchSlot = 9,
    NoSuchBooking = 10,
    NoSuchData = 11,
    SlotTaken = 12,
    SlotOverlap = 13,
    IntegrityViolation = 14,
}

/// Kind of record a `NotFound` error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Venue,
    Slot,
    Booking,
    CalendarDay,
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Missing::Venue => "Venue",
            Missing::Slot => "Time slot",
            Missing::Booking => "Booking",
            Missing::CalendarDay => "Calendar day",
        };
        write!(f, "{}", label)
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("{0} {1} not found")]
    NotFound(Missing, String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Overlapping time slot: {0}")]
    Overlap(String),

    #[error("Data integrity violation: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(kind: Missing, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(kind, id.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidArgument(errors.to_string())
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
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::InvalidFormat(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidFormat, msg.clone())
            }
            AppError::InvalidArgument(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidArgument, msg.clone())
            }
            AppError::InvalidRange(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidRange, msg.clone())
            }
            AppError::InvalidInterval(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidInterval, msg.clone())
            }
            AppError::NotFound(kind, _) => {
                let code = match kind {
                    Missing::Venue => ErrorCode::NoSuchVenue,
                    Missing::Slot => ErrorCode::NoSuchSlot,
                    Missing::Booking => ErrorCode::NoSuchBooking,
                    Missing::CalendarDay => ErrorCode::NoSuchData,
                };
                (StatusCode::NOT_FOUND, code, self.to_string())
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::SlotTaken, msg.clone())
            }
            AppError::Overlap(msg) => {
                (StatusCode::CONFLICT, ErrorCode::SlotOverlap, msg.clone())
            }
            AppError::Integrity(msg) => {
                tracing::error!("Integrity violation: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::IntegrityViolation,
                    "Booking data is inconsistent, an operator has been notified".to_string(),
                )
            }
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    // 23505 = PostgreSQL unique violation
                    if db_err.code().as_deref() == Some("23505") {
                        return (
                            StatusCode::CONFLICT,
                            Json(ErrorResponse {
                                code: ErrorCode::SlotTaken as u32,
                                error: format!("{:?}", ErrorCode::SlotTaken),
                                message: "Resource already exists (duplicate entry)".to_string(),
                            }),
                        )
                            .into_response();
                    }
                }
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
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
