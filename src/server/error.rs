//! API error taxonomy and response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::repository::RepositoryError;

/// Everything a handler can fail with, mapped onto a status code and a
/// short human-readable message. Store internals are logged, not exposed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("All fields required")]
    MissingFields,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("You already generated a blueprint today! Join early access for unlimited generations.")]
    DailyLimit,

    #[error("{message}")]
    Store {
        message: &'static str,
        source: RepositoryError,
    },
}

impl ApiError {
    /// Wrap a store failure with the message the endpoint reports.
    pub fn store(message: &'static str, source: RepositoryError) -> Self {
        ApiError::Store { message, source }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::InvalidEmail | ApiError::DuplicateEmail => {
                StatusCode::BAD_REQUEST
            }
            ApiError::DailyLimit => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store { message, source } = &self {
            error!("store failure ({}): {}", message, source);
        }

        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(ApiError::MissingFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::DailyLimit.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::store("Failed to save email", RepositoryError::UniqueViolation).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
