/**
 * Error Conversion
 *
 * This module converts `ApiError` values into HTTP responses. Handlers
 * return `Result<_, ApiError>` and axum calls this conversion for the
 * error side.
 *
 * # Response Format
 *
 * Error responses are JSON with a fixed `error` string per status and an
 * optional `details` string on validation failures:
 *
 * ```json
 * {"error": "Bad Request", "details": "name must not be empty"}
 * ```
 *
 * Internal errors are logged here with their source, so call sites can
 * propagate with `?` without losing the failure context. The client only
 * ever sees `{"error": "Internal Server Error"}`.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let message = match status {
            StatusCode::BAD_REQUEST => "Bad Request",
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::NOT_FOUND => "Not Found",
            _ => "Internal Server Error",
        };

        let mut body = serde_json::json!({ "error": message });
        if let ApiError::BadRequest {
            details: Some(details),
        } = &self
        {
            body["details"] = serde_json::Value::String(details.clone());
        }

        (status, Json(body)).into_response()
    }
}
