//! Mapping of library errors onto HTTP responses.

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::error;

use citylens_core::Error;

/// Body text for every failure the caller cannot fix.
pub const GENERIC_ERROR_MESSAGE: &str = "Sorry, something went wrong";

#[derive(Debug)]
pub enum ApiError {
    /// Caller-supplied parameters were missing or malformed.
    BadRequest(String),
    /// An external provider failed.
    BadGateway(Error),
    /// Store, configuration, or internal failure.
    Internal(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Provider(_) => ApiError::BadGateway(err),
            _ => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(err) => {
                error!(error = %err, "Provider request failed");
                (StatusCode::BAD_GATEWAY, GENERIC_ERROR_MESSAGE.to_string())
            }
            ApiError::Internal(err) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
