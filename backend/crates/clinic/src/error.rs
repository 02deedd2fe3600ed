//! Clinic Error Types
//!
//! Clinic-specific error variants that render through the unified
//! `kernel::error::AppError` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::service::PredictionError;

/// Clinic-specific result type alias
pub type ClinicResult<T> = Result<T, ClinicError>;

#[derive(Debug, Error)]
pub enum ClinicError {
    /// Request body or query failed validation
    #[error("{0}")]
    Validation(String),

    /// Addressed record does not exist or was deleted
    #[error("{0}")]
    NotFound(&'static str),

    /// NIK belongs to another live patient
    #[error("{0}")]
    NikTaken(&'static str),

    /// Stored answers cannot be turned into scoring features
    #[error("Assessment answers are not numeric: {0}")]
    InvalidAnswers(#[source] serde_json::Error),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClinicError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClinicError::Validation(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClinicError::Validation(_) | ClinicError::NikTaken(_) => ErrorKind::BadRequest,
            ClinicError::NotFound(_) => ErrorKind::NotFound,
            ClinicError::InvalidAnswers(_)
            | ClinicError::Prediction(_)
            | ClinicError::Database(_)
            | ClinicError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Store and parse details stay in the log; the
    /// prediction messages are safe to show.
    pub fn to_app_error(&self) -> AppError {
        match self {
            ClinicError::Prediction(e) => AppError::internal(e.to_string()),
            ClinicError::InvalidAnswers(_) => {
                AppError::internal("Failed to decode assessment answers")
            }
            _ if self.kind().is_server_error() => AppError::internal("Internal server error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ClinicError::Database(e) => {
                tracing::error!(error = %e, "Clinic database error");
            }
            ClinicError::Prediction(e) => {
                tracing::error!(error = ?e, "Prediction request failed");
            }
            ClinicError::InvalidAnswers(e) => {
                tracing::error!(error = %e, "Assessment answers could not be scored");
            }
            ClinicError::Internal(msg) => {
                tracing::error!(message = %msg, "Clinic internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Clinic request rejected");
            }
        }
    }
}

impl IntoResponse for ClinicError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for ClinicError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => ClinicError::Validation(err.message().to_string()),
            _ => ClinicError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ClinicError::NikTaken("NIK already registered").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ClinicError::NotFound("Patient not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ClinicError::Prediction(PredictionError::Upstream { status: 503 }).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_messages() {
        let err = ClinicError::Prediction(PredictionError::Unreachable("refused".into()));
        assert_eq!(err.to_app_error().message(), "Failed to reach prediction service");

        let err = ClinicError::Internal("pool closed".into());
        assert_eq!(err.to_app_error().message(), "Internal server error");

        let err = ClinicError::NotFound("Appointment not found");
        assert_eq!(err.to_app_error().message(), "Appointment not found");
    }
}
