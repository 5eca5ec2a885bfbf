/**
 * API Error Types
 *
 * This module defines the error type used by HTTP handlers. Every handler
 * returns `Result<_, ApiError>`; the error side is converted to a JSON
 * response by the `IntoResponse` impl in `conversion.rs`.
 *
 * # Error Categories
 *
 * ## Client errors
 *
 * - `BadRequest` - validation failure, optionally with a short reason
 * - `Unauthorized` - no session or an invalid one
 * - `Forbidden` - a known caller without the required role
 * - `NotFound` - the resource does not exist for this caller
 *
 * ## Server errors
 *
 * Infrastructure failures all map to 500. They carry their source error so
 * the conversion layer can log it, but the response body never includes it.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Error type returned by every API handler
///
/// Client-facing variants correspond one-to-one with the API's error
/// taxonomy. Infrastructure variants (`Database`, `Token`, `Provider`,
/// `Serialization`) exist so `?` works on the underlying error types; they
/// all surface to the client as `500 Internal Server Error`.
///
/// # Usage
///
/// ```rust
/// use canvelot::error::ApiError;
///
/// let err = ApiError::bad_request_with("name must not be empty");
/// assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request validation failed
    #[error("bad request")]
    BadRequest {
        /// Optional short reason included in the response body
        details: Option<String>,
    },

    /// No session, or the presented session is invalid/revoked
    #[error("unauthorized")]
    Unauthorized,

    /// The caller is known but lacks the required role
    #[error("forbidden")]
    Forbidden,

    /// The resource does not exist, or must not be observable by this caller
    #[error("not found")]
    NotFound,

    /// Unexpected failure with a server-side description
    #[error("internal error: {0}")]
    Internal(String),

    /// Database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session token signing/verification failure
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// OAuth provider request failure
    #[error("provider request error: {0}")]
    Provider(#[from] reqwest::Error),

    /// JSON serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Create a bad request error without details
    pub fn bad_request() -> Self {
        Self::BadRequest { details: None }
    }

    /// Create a bad request error with a short reason
    ///
    /// # Arguments
    ///
    /// * `details` - Reason string included in the response body
    pub fn bad_request_with(details: impl Into<String>) -> Self {
        Self::BadRequest {
            details: Some(details.into()),
        }
    }

    /// Create an internal error with a server-side description
    ///
    /// The description is logged but never sent to the client.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `BadRequest` - 400
    /// - `Unauthorized` - 401
    /// - `Forbidden` - 403
    /// - `NotFound` - 404
    /// - everything else - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_)
            | Self::Database(_)
            | Self::Token(_)
            | Self::Provider(_)
            | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
