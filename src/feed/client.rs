//! Twitter API v2 client
//!
//! Implements [`FeedProvider`] over HTTP with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::models::{RawTimeline, UserLookup};
use super::{FeedError, FeedProvider};

const TWEET_FIELDS: &str = "created_at,text";
const USER_FIELDS: &str = "name,username,profile_image_url";

/// Client for the Twitter API v2.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    client: Client,
    base_url: Url,
}

impl TwitterClient {
    /// Create a client whose every call is bounded by `timeout`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FeedError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FeedError::Upstream(format!("base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send an authorised GET and parse the JSON body.
    ///
    /// Returns `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, bearer_token: &str) -> Result<Option<T>, FeedError> {
        debug!("GET {}", url.path());

        let response = self.client.get(url).bearer_auth(bearer_token).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FeedError::Upstream(format!("provider responded with {status}")));
        }

        let text = response.text().await?;
        Ok(Some(serde_json::from_str(&text)?))
    }
}

#[async_trait]
impl FeedProvider for TwitterClient {
    async fn resolve_user_id(&self, bearer_token: &str, handle: &str) -> Result<Option<String>, FeedError> {
        let url = self.endpoint(&["2", "users", "by", "username", handle])?;
        let lookup: Option<UserLookup> = self.get_json(url, bearer_token).await?;
        Ok(lookup.and_then(UserLookup::into_id))
    }

    async fn fetch_timeline(
        &self,
        bearer_token: &str,
        user_id: &str,
        max_results: u8,
    ) -> Result<RawTimeline, FeedError> {
        let mut url = self.endpoint(&["2", "users", user_id, "tweets"])?;
        url.query_pairs_mut()
            .append_pair("max_results", &max_results.to_string())
            .append_pair("tweet.fields", TWEET_FIELDS)
            .append_pair("expansions", "author_id")
            .append_pair("user.fields", USER_FIELDS);

        self.get_json(url, bearer_token)
            .await?
            .ok_or_else(|| FeedError::Upstream(format!("timeline of account {user_id} not found")))
    }
}
