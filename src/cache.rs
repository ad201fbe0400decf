//! Time-boxed memoization for translation results.
//!
//! Every translation is keyed by `(text, source, target)` and remembered
//! for a fixed TTL. Expired entries are detected on read and overwritten
//! in place by the next computation; there is no background eviction, so
//! the map grows without bound under a diverse query stream. At campus
//! scale that is an accepted limitation rather than a problem.
//!
//! The cache is a trait so the bridge can be tested with a fake and the
//! map can later be swapped for a bounded LRU without touching callers.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Composite cache key for one translation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub text: String,
    pub source: String,
    pub target: String,
}

impl CacheKey {
    pub fn new(text: &str, source: &str, target: &str) -> Self {
        Self {
            text: text.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// Storage abstraction owned by the language bridge.
pub trait TranslationCache: Send + Sync {
    /// Fetch a non-expired entry.
    fn get(&self, key: &CacheKey) -> Option<String>;
    /// Insert or overwrite an entry, resetting its age.
    fn set(&self, key: CacheKey, value: String);
    /// Number of live (non-expired) entries.
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct CachedValue {
    text: String,
    inserted_at: Instant,
}

/// In-memory TTL cache.
///
/// Concurrent writers can race on the same key; both compute the same
/// value for the same inputs, so last-write-wins is harmless and the map
/// is guarded by a plain mutex rather than anything finer-grained.
pub struct MemoryTtlCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CachedValue>>,
}

impl MemoryTtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl TranslationCache for MemoryTtlCache {
    fn get(&self, key: &CacheKey) -> Option<String> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        entries
            .get(key)
            .filter(|v| v.inserted_at.elapsed() < self.ttl)
            .map(|v| v.text.clone())
    }

    fn set(&self, key: CacheKey, value: String) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key,
            CachedValue {
                text: value,
                inserted_at: Instant::now(),
            },
        );
    }

    fn len(&self) -> usize {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        entries
            .values()
            .filter(|v| v.inserted_at.elapsed() < self.ttl)
            .count()
    }
}
