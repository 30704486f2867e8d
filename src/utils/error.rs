use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::layout::TemplateViolation;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    // Lifecycle errors. All terminal; see each variant for the retry story.
    #[error("Registration is closed for this event")]
    RegistrationClosed,

    #[error("Event has reached its participant limit")]
    EventFull,

    #[error("User is already registered for this event")]
    AlreadyRegistered,

    #[error("Attendance token does not match")]
    InvalidToken,

    #[error("The attendance window is not open")]
    AttendanceWindowClosed,

    #[error("Attendance was already recorded")]
    AlreadyAttended,

    #[error("Participant is not eligible for a certificate")]
    NotEligible,

    #[error("A certificate was already issued for this participant")]
    CertificateAlreadyExists,

    #[error("Template validation failed")]
    TemplateValidation(Vec<TemplateViolation>),

    // Ambient errors.
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::RegistrationClosed
            | AppError::EventFull
            | AppError::AlreadyRegistered
            | AppError::AttendanceWindowClosed
            | AppError::AlreadyAttended
            | AppError::NotEligible
            | AppError::CertificateAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidToken => StatusCode::BAD_REQUEST,
            AppError::TemplateValidation(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalServiceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::RegistrationClosed => "REGISTRATION_CLOSED",
            AppError::EventFull => "EVENT_FULL",
            AppError::AlreadyRegistered => "ALREADY_REGISTERED",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::AttendanceWindowClosed => "ATTENDANCE_WINDOW_CLOSED",
            AppError::AlreadyAttended => "ALREADY_ATTENDED",
            AppError::NotEligible => "NOT_ELIGIBLE",
            AppError::CertificateAlreadyExists => "CERTIFICATE_ALREADY_EXISTS",
            AppError::TemplateValidation(_) => "TEMPLATE_VALIDATION_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::ExternalServiceError(msg) => {
                error!(message = %msg, "External service error");
            }
            AppError::Internal(msg) => {
                error!(message = %msg, "Internal error");
            }
            other => {
                warn!(code = other.code(), message = %other, "Request rejected");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Internal detail stays in the logs, not in the API response.
        let public_message = match &self {
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            other => other.to_string(),
        };

        let details = match &self {
            AppError::TemplateValidation(violations) => serde_json::to_value(violations).ok(),
            _ => None,
        };

        error_response(code, public_message, details, status)
    }
}
