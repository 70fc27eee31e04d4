use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::response::error as error_response;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("An account with this email already exists")]
    DuplicateEmail,

    /// Unknown email and wrong password collapse into this one variant.
    #[error("Invalid email or password")]
    AuthFailure,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::AuthFailure | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Migration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::DuplicateEmail => "DUPLICATE_EMAIL",
            AppError::AuthFailure => "AUTH_FAILURE",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Migration(_) => "MIGRATION_ERROR",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Message safe to show to an end user.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Forbidden(msg) | AppError::NotFound(msg) => {
                msg.clone()
            }
            AppError::Database(_) | AppError::Migration(_) | AppError::Internal(_) => {
                "Something went wrong, please try again".to_string()
            }
            other => other.to_string(),
        }
    }

    fn log(&self) {
        match self {
            AppError::Database(e) => error!(error = ?e, "Database error"),
            AppError::Migration(e) => error!(error = ?e, "Migration error"),
            AppError::Internal(msg) => error!(message = %msg, "Internal error"),
            other => warn!(code = other.code(), message = %other, "Request rejected"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        error_response(self.code(), self.public_message(), None, self.status_code())
    }
}
