//! Server module - HTTP surface of the backend.

mod auth;
mod error;
mod router;
mod runtime;

pub use error::ApiError;
pub use router::{AppState, build_router};
pub use runtime::run;
