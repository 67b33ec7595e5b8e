//! In-memory quote cache.
//!
//! Time-based caching for upstream API responses to reduce upstream
//! calls and improve response times. Entries are created on the first
//! successful fetch for a key, overwritten on refresh, and never
//! deleted - stale entries are simply superseded by the next `put`.
//! There is no capacity bound; unbounded growth is an accepted
//! limitation of this service.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde_json::Value;

/// Cache TTL for quote payloads (5 minutes - prices move, but the
/// upstream free tier is not real-time anyway).
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// A cached upstream payload.
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    stored_at: Instant,
}

/// Process-wide cache mapping request keys to upstream payloads.
///
/// Shared by every request handler. Reads and writes are synchronous
/// and never held across await points. Concurrent misses for the same
/// key may both fetch upstream and both write - last write wins, which
/// duplicates an upstream call but never corrupts state. No
/// single-flight coalescing is attempted.
#[derive(Debug)]
pub struct QuoteCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl QuoteCache {
    /// Create an empty cache with the given TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a fresh payload for `key`.
    ///
    /// Returns a clone of the stored payload only if it was written
    /// less than the TTL ago; a stale entry behaves as a miss and is
    /// left in place until the next `put` overwrites it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    /// Store `payload` under `key` with the current timestamp,
    /// unconditionally overwriting any prior entry.
    pub fn put(&self, key: &str, payload: Value) {
        self.put_at(key, payload, Instant::now());
    }

    /// `get` against an explicit clock reading.
    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<Value> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if now.duration_since(entry.stored_at) < self.ttl {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    /// `put` against an explicit clock reading.
    pub(crate) fn put_at(&self, key: &str, payload: Value, now: Instant) {
        self.entries.write().insert(
            key.to_string(),
            CacheEntry {
                payload,
                stored_at: now,
            },
        );
    }

    /// Number of entries currently stored, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}
