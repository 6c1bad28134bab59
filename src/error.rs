//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used by every handler.
//! It is the one place where error kinds from the store and the token service
//! are mapped to HTTP status codes.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can
//! return `Result<_, AppError>` and use `?`. Responses carry a JSON body of the
//! form `{"message": "..."}`. Details of authentication and internal failures
//! are logged, never sent to the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Client-facing message for every 401 response.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access";
/// Client-facing message for every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Represents all errors a handler can answer with.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication is required but missing or invalid (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The request body could not be parsed (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// The requested resource does not exist (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Anything unexpected, including store failures and malformed identifiers (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// The message sent to the client.
    pub fn client_message(&self) -> &str {
        match self {
            AppError::Unauthorized(_) => UNAUTHORIZED_MESSAGE,
            AppError::InternalServerError(_) => INTERNAL_ERROR_MESSAGE,
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg,
        }
    }

    /// Renders the error with an additional `"success": false` field.
    pub fn failure_response(&self) -> HttpResponse {
        self.log();
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.client_message()
        }))
    }

    fn log(&self) {
        if let AppError::InternalServerError(detail) = self {
            log::error!("{}", detail);
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.log();
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.client_message()
        }))
    }
}

/// Maps store error kinds to HTTP errors.
///
/// Malformed identifiers surface as 500, like any other failed store call.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::NotFound { entity } => AppError::NotFound(format!("{} not found", entity)),
            StoreError::Conflict(msg) => AppError::BadRequest(msg),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::InvalidOrExpired(_) => AppError::Unauthorized(error.to_string()),
            AuthError::Signing(_) => AppError::InternalServerError(error.to_string()),
        }
    }
}
