//! Configuration module for Shelf.
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

const DEFAULT_TWITTER_API_BASE: &str = "https://api.twitter.com";

/// Feed provider (Twitter API v2) settings.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    /// Bearer token sent with every provider call.
    pub bearer_token: Option<String>,

    /// Account whose latest posts are served (without @).
    pub username: Option<String>,

    /// Provider base URL, overridable for staging or tests.
    pub api_base: Url,

    /// Freshness window of the cached feed.
    pub cache_ttl: Duration,

    /// Timeout applied to each outbound call.
    pub timeout: Duration,

    /// Serve the stale feed when a refresh fails upstream.
    pub serve_stale: bool,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    /// Directory holding `blogs.json`, `games.json` and `dramas.json`.
    pub data_dir: PathBuf,

    /// Shared secret required in `x-api-key` for writes.
    /// Writes are open when unset.
    pub api_key: Option<String>,

    pub twitter: TwitterConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing feed credentials are not an error here; the feed endpoint
    /// reports them per request.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            None => 3000,
        };

        let api_base = var("TWITTER_API_BASE").unwrap_or_else(|| DEFAULT_TWITTER_API_BASE.to_string());
        let api_base = Url::parse(&api_base)
            .with_context(|| format!("TWITTER_API_BASE is not a valid URL: {api_base:?}"))?;

        // Strip @ if present
        let username = var("TWITTER_USERNAME")
            .map(|s| s.trim_start_matches('@').to_string())
            .filter(|s| !s.is_empty());

        let twitter = TwitterConfig {
            bearer_token: var("TWITTER_BEARER_TOKEN"),
            username,
            api_base,
            cache_ttl: Duration::from_secs(parse_secs(var("TWITTER_CACHE_TTL_SECS"), "TWITTER_CACHE_TTL_SECS", 3600)?),
            timeout: Duration::from_secs(parse_secs(var("TWITTER_TIMEOUT_SECS"), "TWITTER_TIMEOUT_SECS", 10)?),
            serve_stale: parse_bool(var("TWITTER_SERVE_STALE"), "TWITTER_SERVE_STALE")?,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            data_dir: var("DATA_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data")),
            api_key: var("API_KEY"),
            twitter,
        })
    }
}

fn parse_secs(raw: Option<String>, key: &str, default: u64) -> Result<u64> {
    match raw {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds, got {raw:?}")),
        None => Ok(default),
    }
}

fn parse_bool(raw: Option<String>, key: &str) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(false);
    };

    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{key} must be a boolean, got {raw:?}"),
    }
}
