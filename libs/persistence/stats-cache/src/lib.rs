//! In-process expiring key/value store for memoized statistics.
//!
//! Aggregation results are stored in serialized JSON form so a single
//! process-wide cache can hold heterogeneous aggregate shapes (weekly
//! lists, yearly objects, ...) under one key space. Entries expire a
//! fixed interval after the write; expired entries are purged lazily on
//! the first read that finds them.

pub mod key;

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::{Duration, Instant},
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Entries live for one hour after the write.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// Concurrency-safe expiring cache for aggregation results.
///
/// One instance is created at process start and shared (via `Arc`) by all
/// request handlers. `get` and `set` never block on I/O and never fail; a
/// missing or expired key is an ordinary `None`, signalling "recompute".
///
/// Concurrent `set` calls for the same key are last-write-wins; a racing
/// `get` observes either the old value, the new value, or nothing.
pub struct StatsCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl Default for StatsCache {
    fn default() -> Self { Self::new() }
}

impl StatsCache {
    pub fn new() -> Self { Self::with_ttl(DEFAULT_TTL) }

    /// TTL is uniform across all entries; this constructor exists so tests
    /// can shrink the window, not to make expiry configurable per call.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Store `value` under `key`, replacing any live entry and its expiry.
    ///
    /// A value that cannot be serialized is skipped rather than cached;
    /// the next read simply misses and the caller recomputes.
    pub fn set<T>(&self, key: impl Into<String>, value: &T)
    where
        T: Serialize,
    {
        let key = key.into();
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("not caching {key}: {err}");
                return;
            }
        };

        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.write().insert(key, entry);
    }

    /// Fetch the value stored under `key`, or `None` when the key is
    /// absent or its entry has expired. An expired entry found here is
    /// removed as a side effect; there is no background sweep.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let now = Instant::now();

        {
            let entries = self.read();
            let entry = entries.get(key)?;
            if now < entry.expires_at {
                return match serde_json::from_value(entry.value.clone()) {
                    Ok(value) => Some(value),
                    Err(err) => {
                        tracing::warn!(
                            "cached value under {key} does not deserialize: {err}"
                        );
                        None
                    }
                };
            }
        }

        // The entry was expired under the read lock. Re-check under the
        // write lock so a concurrent overwrite is not thrown away.
        let mut entries = self.write();
        if let Some(entry) = entries.get(key) {
            if now >= entry.expires_at {
                entries.remove(key);
            }
        }
        None
    }

    /// Number of stored entries, counting expired ones not yet purged.
    pub fn len(&self) -> usize { self.read().len() }

    pub fn is_empty(&self) -> bool { self.read().is_empty() }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Compose a cache key from the caller identity and query parameters.
///
/// `:` is the separator; user ids and categories never contain it, so
/// distinct `(user_id, category, params)` triples map to distinct keys.
pub fn generate_key(user_id: &str, category: &str, params: &str) -> String {
    format!("{user_id}:{category}:{params}")
}
