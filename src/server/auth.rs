//! Shared-secret guard for write requests.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use super::{ApiError, AppState};

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject writes without the configured key. Reads always pass.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    if !is_write(request.method()) {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided == Some(expected) {
        Ok(next.run(request).await)
    } else {
        warn!("Rejected {} {} without a valid API key", request.method(), request.uri().path());
        Err(ApiError::Unauthorized)
    }
}

fn is_write(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}
