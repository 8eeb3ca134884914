//! Feed module - latest posts of one account from the Twitter API.
//!
//! - `FeedProvider` - External source seam
//! - `TwitterClient` - HTTP implementation of the provider
//! - `FeedService` - Read-through cache in front of the provider

mod client;
mod error;
mod models;
mod provider;
mod service;

pub use client::TwitterClient;
pub use error::FeedError;
pub use models::FeedItem;
pub use provider::FeedProvider;
pub use service::{FeedCache, FeedService, FeedSettings};

#[cfg(test)]
pub(crate) use service::tests::FakeProvider;
