//! Route handlers, one module per resource.

pub mod blogs;
pub mod dramas;
pub mod games;
pub mod tweets;

use crate::server::ApiError;

/// Parse a numeric path id. Anything else matches no record.
fn numeric_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}
