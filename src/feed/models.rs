//! Feed items and the provider payloads they are built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FeedError;

/// Author block attached to every item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedAuthor {
    pub display_name: String,
    pub handle: String,
    pub avatar_url: String,
}

/// A normalised post as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author: FeedAuthor,
}

/// Response of the username lookup call.
#[derive(Debug, Deserialize)]
pub struct UserLookup {
    #[serde(default)]
    data: Option<UserRef>,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    id: String,
}

impl UserLookup {
    /// The resolved account id, if any.
    pub fn into_id(self) -> Option<String> {
        self.data.map(|user| user.id).filter(|id| !id.is_empty())
    }
}

/// Response of the timeline call with author expansion.
#[derive(Debug, Default, Deserialize)]
pub struct RawTimeline {
    #[serde(default)]
    pub data: Vec<RawPost>,
    #[serde(default)]
    pub includes: Option<RawIncludes>,
    #[serde(default)]
    pub errors: Vec<RawProblem>,
    #[serde(default)]
    pub meta: Option<RawMeta>,
}

/// Error object the provider sends alongside (or instead of) data.
#[derive(Debug, Deserialize)]
pub struct RawProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl RawProblem {
    fn describe(&self) -> &str {
        self.detail
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("unknown error")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMeta {
    #[serde(default)]
    pub result_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RawPost {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawIncludes {
    #[serde(default)]
    pub users: Vec<RawUser>,
}

#[derive(Debug, Deserialize)]
pub struct RawUser {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub profile_image_url: String,
}

impl RawTimeline {
    /// Reshape into feed items, keeping at most `limit`.
    ///
    /// The provider returns one author for the whole page; it is copied onto
    /// every item. Only a page the provider reports as empty (`result_count`
    /// of 0, no errors) needs no author.
    pub fn normalize(self, limit: usize) -> Result<Vec<FeedItem>, FeedError> {
        if self.data.is_empty() {
            if let Some(problem) = self.errors.first() {
                return Err(FeedError::Upstream(format!(
                    "provider returned errors: {}",
                    problem.describe()
                )));
            }
            let reported_empty = self.meta.and_then(|meta| meta.result_count) == Some(0);
            return if reported_empty {
                Ok(Vec::new())
            } else {
                Err(FeedError::Upstream("response carried neither posts nor a result count".to_string()))
            };
        }

        let user = self
            .includes
            .and_then(|includes| includes.users.into_iter().next())
            .ok_or_else(|| FeedError::Upstream("response did not include the author".to_string()))?;

        let author = FeedAuthor {
            display_name: user.name,
            handle: user.username,
            avatar_url: user.profile_image_url,
        };

        Ok(self
            .data
            .into_iter()
            .take(limit)
            .map(|post| FeedItem {
                text: post.text,
                created_at: post.created_at,
                author: author.clone(),
            })
            .collect())
    }
}
