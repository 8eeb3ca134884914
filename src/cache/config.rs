//! Cache configuration.

use std::time::Duration;

/// Configuration for a single-entry cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum age of an entry before it is refreshed.
    pub ttl: Duration,

    /// Return the stale entry when a refresh fails upstream.
    /// When false the refresh error reaches the caller.
    pub serve_stale_on_error: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600), // 1 hour
            serve_stale_on_error: false,
        }
    }
}

impl CacheConfig {
    /// Set time-to-live for the entry.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = duration;
        self
    }

    /// Enable or disable serving stale data on upstream failure.
    #[must_use]
    pub fn serve_stale_on_error(mut self, enabled: bool) -> Self {
        self.serve_stale_on_error = enabled;
        self
    }
}
