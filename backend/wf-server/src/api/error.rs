//! REST API error types
//!
//! Every failure renders the same JSON envelope:
//! `{ statusCode, success: false, message, errors }`.

use wf_auth::AuthError;
use wf_db::DbError;

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON failure envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    pub status_code: u16,
    pub success: bool,
    pub message: String,
    pub errors: Vec<String>,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request field (400)
    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    /// Wrong password (400)
    #[error("Bad credentials: {message} {location}")]
    BadCredentials {
        message: String,
        location: ErrorLocation,
    },

    /// Missing, invalid, or expired token (401)
    #[error("Unauthorized: {message} {location}")]
    Unauthorized {
        message: String,
        location: ErrorLocation,
    },

    /// Authenticated but not allowed (403)
    #[error("Forbidden: {message} {location}")]
    Forbidden {
        message: String,
        location: ErrorLocation,
    },

    /// Resource not found (404)
    #[error("Resource not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// Email already in use (400)
    #[error("Conflict: {message} {location}")]
    Conflict {
        message: String,
        location: ErrorLocation,
    },

    /// Internal server error (500)
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: field.map(str::to_string),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::BadCredentials { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            // The upstream API reports duplicate emails as a plain 400
            ApiError::Conflict { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ApiError::Validation { message, .. }
            | ApiError::BadCredentials { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::Forbidden { message, .. }
            | ApiError::NotFound { message, .. }
            | ApiError::Conflict { message, .. }
            | ApiError::Internal { message, .. } => message.clone(),
        }
    }

    fn errors(&self) -> Vec<String> {
        match self {
            ApiError::Validation {
                field: Some(field), ..
            } => vec![field.clone()],
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log with location for debugging
        log::error!("{}", self);

        let status = self.status();
        let body = ApiFailure {
            status_code: status.as_u16(),
            success: false,
            message: self.client_message(),
            errors: self.errors(),
        };

        (status, Json(body)).into_response()
    }
}

/// Convert database errors to API errors
impl From<DbError> for ApiError {
    #[track_caller]
    fn from(e: DbError) -> Self {
        log::error!("Database error: {}", e);

        match e {
            DbError::UniqueViolation { field: "email", .. } => ApiError::Conflict {
                message: "Email is already taken".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            DbError::UniqueViolation { .. } => ApiError::Conflict {
                message: "Resource already exists".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            // Don't expose internal database details to clients
            _ => ApiError::Internal {
                message: "Database operation failed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

/// Convert token and password errors to API errors
impl From<AuthError> for ApiError {
    #[track_caller]
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::TokenExpired { .. } => ApiError::Unauthorized {
                message: "Token is expired".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            AuthError::JwtDecode { .. }
            | AuthError::InvalidToken { .. }
            | AuthError::InvalidClaim { .. } => ApiError::Unauthorized {
                message: "Invalid token".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            AuthError::JwtEncode { .. } | AuthError::PasswordHash { .. } => {
                log::error!("Auth internal error: {}", e);
                ApiError::Internal {
                    message: "Authentication processing failed".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
