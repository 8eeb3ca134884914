//! Read-through feed service.
//!
//! Serves the latest posts of the configured account, refreshing from the
//! provider at most once per freshness window.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::SingleEntryCache;
use crate::config::TwitterConfig;

use super::{FeedError, FeedItem, FeedProvider};

/// Number of posts requested per refresh.
pub const PAGE_SIZE: u8 = 5;

/// Provider credentials and target account.
#[derive(Debug, Clone, Default)]
pub struct FeedSettings {
    pub bearer_token: Option<String>,
    pub username: Option<String>,
}

impl From<&TwitterConfig> for FeedSettings {
    fn from(config: &TwitterConfig) -> Self {
        Self {
            bearer_token: config.bearer_token.clone(),
            username: config.username.clone(),
        }
    }
}

impl FeedSettings {
    fn credentials(&self) -> Result<(&str, &str), FeedError> {
        let token = self
            .bearer_token
            .as_deref()
            .ok_or(FeedError::Configuration("TWITTER_BEARER_TOKEN"))?;
        let username = self
            .username
            .as_deref()
            .ok_or(FeedError::Configuration("TWITTER_USERNAME"))?;
        Ok((token, username))
    }
}

/// Cache of normalised feed items.
pub type FeedCache = SingleEntryCache<Vec<FeedItem>>;

/// Feed service: cache in front of a [`FeedProvider`].
pub struct FeedService {
    settings: FeedSettings,
    provider: Arc<dyn FeedProvider>,
    cache: FeedCache,
    /// Held while refreshing so concurrent misses share one round-trip.
    refresh_lock: Mutex<()>,
}

impl FeedService {
    pub fn new(settings: FeedSettings, provider: Arc<dyn FeedProvider>, cache: FeedCache) -> Self {
        Self {
            settings,
            provider,
            cache,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Get the latest feed items.
    ///
    /// A fresh cache entry is returned without touching the provider.
    /// Failed refreshes leave the existing entry as it was.
    pub async fn get_feed(&self) -> Result<Vec<FeedItem>, FeedError> {
        if let Some(items) = self.cache.fresh() {
            debug!("Feed served from cache");
            return Ok(items);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another request may have refreshed while we waited
        if let Some(items) = self.cache.fresh() {
            debug!("Feed refreshed by a concurrent request");
            return Ok(items);
        }

        match self.refresh().await {
            Ok(items) => Ok(items),
            Err(err @ FeedError::Upstream(_)) if self.cache.config().serve_stale_on_error => {
                match self.cache.snapshot() {
                    Some(stale) => {
                        warn!("Feed refresh failed, serving entry from {}: {}", stale.fetched_at, err);
                        Ok(stale.value)
                    }
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    async fn refresh(&self) -> Result<Vec<FeedItem>, FeedError> {
        let (token, username) = self.settings.credentials()?;

        let user_id = self
            .provider
            .resolve_user_id(token, username)
            .await?
            .ok_or_else(|| FeedError::NotFound(username.to_string()))?;

        let timeline = self.provider.fetch_timeline(token, &user_id, PAGE_SIZE).await?;
        let items = timeline.normalize(PAGE_SIZE as usize)?;

        let fetched_at = self.cache.store(items.clone());
        info!("Fetched {} posts for @{} at {}", items.len(), username, fetched_at);

        Ok(items)
    }
}

impl std::fmt::Debug for FeedService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedService")
            .field("username", &self.settings.username)
            .field("cache", &self.cache)
            .finish()
    }
}
