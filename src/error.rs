//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every handler returns `Result<_, AppError>`, and the variants line up one-to-one with
//! the HTTP outcomes the API promises: 401 for authentication failures, 403 for denied
//! access, 404 for missing resources, 400/422 for bad input, 409 for uniqueness conflicts
//! and 500 for store or signing failures.
//!
//! `AppError` implements `actix_web::error::ResponseError`, rendering the standard
//! `{success: false, error}` envelope. `From` implementations for `sqlx::Error`,
//! `validator::ValidationErrors`, `bcrypt::BcryptError` and [`TokenError`] let handlers
//! use the `?` operator throughout.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::token::TokenError;
use crate::response::ApiResponse;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, malformed, invalid or expired credentials (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Authenticated, but not allowed to touch the resource (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Malformed request or missing required field (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// The requested resource does not exist (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// A uniqueness constraint would be violated (HTTP 409).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Unexpected server-side failure (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Failure reported by the persistence layer (HTTP 500).
    #[error("Database Error: {0}")]
    DatabaseError(String),
    /// Input failed field validation (HTTP 422 Unprocessable Entity).
    #[error("Validation Error: {0}")]
    ValidationError(String),
}

impl AppError {
    /// Message safe to show to the client.
    ///
    /// Server-side failures are reported generically; their details only go to the log.
    fn client_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::InternalServerError(_) => "Internal server error".to_string(),
            AppError::DatabaseError(_) => "Database error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(ApiResponse::<()>::error(self.client_message()))
    }
}

/// `RowNotFound` maps to `NotFound`; everything else is a database failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// Verification failures are client errors; signing failures are ours.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Signing(_) => AppError::InternalServerError(error.to_string()),
            _ => AppError::Unauthorized(format!("Invalid token: {}", error)),
        }
    }
}
