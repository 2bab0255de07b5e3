//! # Read Cache
//!
//! Time-boxed read cache, keyed by operation signature.
//!
//! ## Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Read Cache                                       │
//! │                                                                         │
//! │  "readAll:Products" ──► CacheEntry { expires_at, value }               │
//! │  "readAll:Invoices" ──► CacheEntry { expires_at, value }               │
//! │                                                                         │
//! │  get(key)   hit + fresh   → deserialized copy                          │
//! │             hit + expired → entry dropped, None                        │
//! │             miss          → None                                       │
//! │  put(key)   best-effort (an unserializable value is just not cached)   │
//! │  clear()    called after EVERY successful mutation                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is an explicit context object owned by the store - created with it,
//! dropped with it, no module-level singletons. Invalidation is NOT
//! transactionally linked to the file write: a crash between write and
//! clear can leave a stale entry until its TTL expires. Accepted window.
//!
//! Values are stored as `serde_json::Value` so one cache serves every
//! entity type behind the same typed `get`/`put` surface.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Default freshness window for cached reads.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(2);

struct CacheEntry {
    expires_at: Instant,
    value: serde_json::Value,
}

/// TTL read cache keyed by operation signature.
pub struct ReadCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ReadCache {
    /// Creates a cache with the given TTL. A zero TTL disables caching
    /// (every entry is born expired).
    pub fn new(ttl: Duration) -> Self {
        ReadCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh hit or nothing. Expired entries are dropped on access.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;
        if Instant::now() >= entry.expires_at {
            entries.remove(key);
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Caches a value under an operation key. Best-effort: serialization
    /// failures are logged and skipped, never surfaced.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "value not cacheable");
                return;
            }
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.to_string(),
                CacheEntry {
                    expires_at: Instant::now() + self.ttl,
                    value,
                },
            );
        }
    }

    /// Drops every entry. Called after each successful mutation so the next
    /// read reloads from disk.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Number of live entries (expired-but-unaccessed entries count).
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let cache = ReadCache::new(Duration::from_secs(60));
        cache.put("readAll:Products", &vec!["Widget".to_string()]);

        let hit: Option<Vec<String>> = cache.get("readAll:Products");
        assert_eq!(hit, Some(vec!["Widget".to_string()]));
    }

    #[test]
    fn test_zero_ttl_disables_caching() {
        let cache = ReadCache::new(Duration::ZERO);
        cache.put("key", &1_u32);
        assert_eq!(cache.get::<u32>("key"), None);
        // The expired entry was dropped on access
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_drops_everything() {
        let cache = ReadCache::new(Duration::from_secs(60));
        cache.put("a", &1_u32);
        cache.put("b", &2_u32);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get::<u32>("a"), None);
    }

    #[test]
    fn test_miss_on_unknown_key() {
        let cache = ReadCache::new(Duration::from_secs(60));
        assert_eq!(cache.get::<u32>("nope"), None);
    }
}
