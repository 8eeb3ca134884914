//! HTTP error responses.
//!
//! Every failure leaves the server as `{ "error": <message> }`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::feed::FeedError;
use crate::storage::StoreError;
use crate::utils::fields::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.0)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Feed(err) => match err {
                FeedError::NotFound(_) => (StatusCode::NOT_FOUND, "User not found".to_string()),
                FeedError::Configuration(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Twitter API is not configured".to_string(),
                ),
                FeedError::Upstream(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch tweets".to_string(),
                ),
            },
            Self::Store(StoreError::Rejected(message)) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        match &self {
            Self::Feed(err) => warn!("Feed request failed: {}", err),
            Self::Store(err) if status.is_server_error() => error!("Storage failure: {}", err),
            _ => {}
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
