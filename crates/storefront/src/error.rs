//! Unified error handling with Sentry integration.
//!
//! The storefront serves humans, so errors render as minimal HTML pages
//! rather than JSON. Database failures are captured to Sentry with the
//! detail hidden from the response.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data failed to parse into a domain type.
    #[error("Data corruption: {0}")]
    DataCorruption(String),

    /// No published menu under the requested slug.
    #[error("Menu not found")]
    MenuNotFound,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Database(_) | Self::DataCorruption(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, message) = match &self {
            Self::Database(_) | Self::DataCorruption(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong. Please try again.".to_owned(),
            ),
            Self::MenuNotFound => (
                StatusCode::NOT_FOUND,
                "This menu doesn't exist. Check the link and try again.".to_owned(),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (
            status,
            Html(format!(
                "<!DOCTYPE html><html><body style=\"font-family:sans-serif;text-align:center;padding:4rem\">\
                 <h1>{}</h1><p>{message}</p></body></html>",
                status.as_u16()
            )),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::MenuNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("nope".to_owned())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".to_owned()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
