//! Feed provider seam.

use async_trait::async_trait;

use super::models::RawTimeline;
use super::FeedError;

/// External source of posts.
///
/// Implementations turn transport and parse failures into
/// [`FeedError::Upstream`]; they never panic on bad payloads.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Resolve a handle to the provider's account id.
    ///
    /// `Ok(None)` means the provider answered but knows no such account.
    async fn resolve_user_id(&self, bearer_token: &str, handle: &str) -> Result<Option<String>, FeedError>;

    /// Fetch the most recent posts of an account with author expansion.
    async fn fetch_timeline(
        &self,
        bearer_token: &str,
        user_id: &str,
        max_results: u8,
    ) -> Result<RawTimeline, FeedError>;
}
