//! Single-entry, time-bounded cache.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::debug;

use super::{CacheConfig, Clock};

/// The stored value and when it was fetched.
///
/// Either fully empty (`value` is `None`) or fully populated; it is only
/// ever replaced as a whole.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: Option<V>,
    fetched_at: DateTime<Utc>,
}

/// Result of reading the entry regardless of age.
#[derive(Debug, Clone)]
pub struct Snapshot<V> {
    pub value: V,
    pub fetched_at: DateTime<Utc>,
    #[allow(dead_code)]
    pub is_fresh: bool,
}

/// A cache holding at most one value with a freshness window.
///
/// Constructed once at start-up, written only through [`SingleEntryCache::store`],
/// read by every request. Clones share the same entry.
pub struct SingleEntryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    entry: Arc<RwLock<CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    name: Arc<str>,
}

impl<V> Clone for SingleEntryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            entry: Arc::clone(&self.entry),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
            name: Arc::clone(&self.name),
        }
    }
}

impl<V> SingleEntryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty cache.
    pub fn new(name: impl Into<Arc<str>>, config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entry: Arc::new(RwLock::new(CacheEntry {
                value: None,
                fetched_at: DateTime::<Utc>::MIN_UTC,
            })),
            clock,
            config,
            name: name.into(),
        }
    }

    /// Get the name of this cache.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get the value if present and younger than the TTL.
    pub fn fresh(&self) -> Option<V> {
        let now = self.clock.now();
        let entry = self.entry.read();
        match &entry.value {
            Some(value) if self.is_fresh_at(entry.fetched_at, now) => Some(value.clone()),
            _ => None,
        }
    }

    /// Get the value whatever its age.
    pub fn snapshot(&self) -> Option<Snapshot<V>> {
        let now = self.clock.now();
        let entry = self.entry.read();
        entry.value.as_ref().map(|value| Snapshot {
            value: value.clone(),
            fetched_at: entry.fetched_at,
            is_fresh: self.is_fresh_at(entry.fetched_at, now),
        })
    }

    /// Replace the entry with `value` stamped at the current time.
    ///
    /// The stamp never moves backwards, even if the clock does.
    pub fn store(&self, value: V) -> DateTime<Utc> {
        let now = self.clock.now();
        let mut entry = self.entry.write();
        let fetched_at = now.max(entry.fetched_at);
        *entry = CacheEntry {
            value: Some(value),
            fetched_at,
        };
        debug!("Cache '{}' refreshed at {}", self.name, fetched_at);
        fetched_at
    }

    fn is_fresh_at(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        // A TTL too large for chrono never expires.
        match Duration::from_std(self.config.ttl) {
            Ok(ttl) => now.signed_duration_since(fetched_at) < ttl,
            Err(_) => true,
        }
    }
}

impl<V> std::fmt::Debug for SingleEntryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entry = self.entry.read();
        f.debug_struct("SingleEntryCache")
            .field("name", &self.name)
            .field("populated", &entry.value.is_some())
            .field("fetched_at", &entry.fetched_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    fn cache_with_clock() -> (SingleEntryCache<Vec<u32>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = SingleEntryCache::new("test", CacheConfig::default(), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_empty_cache_has_nothing() {
        let (cache, _clock) = cache_with_clock();

        assert!(cache.fresh().is_none());
        assert!(cache.snapshot().is_none());
    }

    #[test]
    fn test_entry_is_fresh_within_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.store(vec![1, 2]);

        clock.advance(Duration::minutes(59));
        assert_eq!(cache.fresh(), Some(vec![1, 2]));
    }

    #[test]
    fn test_entry_expires_at_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.store(vec![1]);

        clock.advance(Duration::hours(1));
        assert!(cache.fresh().is_none());

        let snapshot = cache.snapshot().expect("stale entry is kept");
        assert_eq!(snapshot.value, vec![1]);
        assert!(!snapshot.is_fresh);
        assert_eq!(snapshot.fetched_at, start());
    }

    #[test]
    fn test_store_replaces_whole_entry() {
        let (cache, clock) = cache_with_clock();
        cache.store(vec![1, 2, 3]);
        clock.advance(Duration::minutes(90));
        cache.store(vec![4]);

        let snapshot = cache.snapshot().unwrap();
        assert_eq!(snapshot.value, vec![4]);
        assert!(snapshot.is_fresh);
        assert_eq!(snapshot.fetched_at, start() + Duration::minutes(90));
    }

    #[test]
    fn test_fetched_at_never_moves_backwards() {
        let (cache, clock) = cache_with_clock();
        let first = cache.store(vec![1]);

        clock.set(start() - Duration::minutes(5));
        let second = cache.store(vec![2]);

        assert_eq!(second, first);
    }

    #[test]
    fn test_clones_share_entry() {
        let (cache, _clock) = cache_with_clock();
        let other = cache.clone();
        other.store(vec![7]);

        assert_eq!(cache.fresh(), Some(vec![7]));
        assert_eq!(cache.name(), "test");
    }
}
