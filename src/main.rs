//! Shelf - personal site backend
//!
//! Serves blog posts, game rankings and drama progress from JSON files,
//! plus a cached feed of the site owner's latest posts on X/Twitter.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `cache` - Single-entry TTL cache with injectable clock
//! - `feed` - Twitter API client and cached feed service
//! - `storage` - JSON file collections and their repositories
//! - `routes` - HTTP handlers per resource
//! - `server` - Router, error mapping, auth guard and serve loop
//! - `utils` - Payload field helpers

mod cache;
mod config;
mod feed;
mod routes;
mod server;
mod storage;
mod utils;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cache::{CacheConfig, SystemClock};
use config::Config;
use feed::{FeedCache, FeedService, FeedSettings, TwitterClient};
use server::AppState;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" for our crate and request traces
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shelf=info,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Shelf...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Data directory: {}", config.data_dir.display());

    if config.api_key.is_none() {
        warn!("API_KEY is not set, write routes are open");
    }

    let twitter = &config.twitter;
    match (&twitter.bearer_token, &twitter.username) {
        (Some(_), Some(username)) => info!("Tweets feed configured for @{}", username),
        _ => warn!("Twitter credentials missing, /api/tweets will return errors"),
    }

    let client = TwitterClient::new(twitter.api_base.clone(), twitter.timeout)?;
    let cache = FeedCache::new(
        "tweets",
        CacheConfig::default()
            .ttl(twitter.cache_ttl)
            .serve_stale_on_error(twitter.serve_stale),
        Arc::new(SystemClock),
    );
    info!(
        "Cache '{}' initialized (ttl: {}s, serve stale: {})",
        cache.name(),
        twitter.cache_ttl.as_secs(),
        twitter.serve_stale
    );
    let feed = Arc::new(FeedService::new(FeedSettings::from(twitter), Arc::new(client), cache));

    let state = AppState::new(&config, feed);
    let app = server::build_router(state);

    server::run(&config, app).await
}
