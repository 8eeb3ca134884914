//! Cache module - in-memory, time-bounded caching.
//!
//! ## Architecture
//!
//! - `SingleEntryCache` - One value plus the time it was fetched
//! - `CacheConfig` - Freshness window and stale-on-error policy
//! - `Clock` - Time source, swapped for a manual clock in tests
//!
//! ## Usage
//!
//! ```rust
//! let cache = SingleEntryCache::new("feed", CacheConfig::default(), Arc::new(SystemClock));
//!
//! if let Some(items) = cache.fresh() {
//!     return Ok(items);
//! }
//! cache.store(fetch().await?);
//! ```

mod clock;
mod config;
mod single;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::ManualClock;
pub use config::CacheConfig;
pub use single::SingleEntryCache;
