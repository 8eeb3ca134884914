//! Feed errors.

use thiserror::Error;

/// Errors that can occur while serving the feed.
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// Credential or target handle missing
    #[error("feed is not configured: {0} is missing")]
    Configuration(&'static str),

    /// The configured handle does not resolve to an account
    #[error("account @{0} was not found")]
    NotFound(String),

    /// Transport failure or unusable response from the provider
    #[error("feed provider request failed: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Upstream("request timed out".to_string())
        } else {
            Self::Upstream(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Upstream(format!("unparseable response: {err}"))
    }
}
