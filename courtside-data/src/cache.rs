//! Time-bounded cache of search results keyed by bounding box.
//!
//! Entries are never evicted by size. They stop being returned once their
//! TTL elapses and are only removed by [`ResultCache::purge_expired`] or by
//! being overwritten.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use courtside_core::BoundingBox;
use tokio::time::Instant;

/// Canonical key for a bounding box.
///
/// Built from the box's JSON serialisation, whose field order is fixed, so
/// equal boxes always produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for `bounds`.
    #[must_use]
    pub fn for_bounds(bounds: &BoundingBox) -> Self {
        match serde_json::to_string(bounds) {
            Ok(json) => Self(json),
            Err(_) => Self(format!("{bounds:?}")),
        }
    }

    /// Borrow the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    stored_at: Instant,
    /// `None` when the TTL overflows the clock.
    expires_at: Option<Instant>,
}

impl<T> CacheEntry<T> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

/// Concurrent TTL cache.
///
/// Readers share an `RwLock`; concurrent writers to the same key race and
/// the last write wins.
#[derive(Debug)]
pub struct ResultCache<T> {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry<T>>>,
}

impl<T: Clone> ResultCache<T> {
    /// Create an empty cache whose entries live for `ttl`.
    ///
    /// A TTL too long for the clock keeps entries until they are replaced.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, CacheEntry<T>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, CacheEntry<T>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached data for `key`, if present and not yet expired.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<T> {
        let now = Instant::now();
        self.read()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.data.clone())
    }

    /// How long ago the live entry for `key` was stored.
    #[must_use]
    pub fn age(&self, key: &CacheKey) -> Option<Duration> {
        let now = Instant::now();
        self.read()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| now.saturating_duration_since(entry.stored_at))
    }

    /// Store `data` under `key`, replacing any previous entry.
    pub fn set(&self, key: CacheKey, data: T) {
        let stored_at = Instant::now();
        let entry = CacheEntry {
            data,
            stored_at,
            expires_at: stored_at.checked_add(self.ttl),
        };
        self.write().insert(key, entry);
    }

    /// Drop expired entries and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
