use std::collections::HashMap;

/// How long a cached listing response stays fresh.
pub const DEFAULT_TTL_MS: f64 = 30_000.0;

struct CacheEntry<T> {
    value: T,
    stored_at: f64,
}

/// Short-lived response cache keyed by the canonical query string.
///
/// At most one entry per key; entries are superseded by newer inserts or
/// dropped wholesale by `clear` (force load, tab refocus, history
/// navigation). There is no size-based eviction.
///
/// The cache never reads a clock itself. Callers pass `now_ms` (the
/// frontend uses `js_sys::Date::now()`), which keeps freshness decisions
/// deterministic under test.
pub struct ResponseCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    ttl_ms: f64,
}

impl<T> ResponseCache<T> {
    pub fn new(ttl_ms: f64) -> ResponseCache<T> {
        ResponseCache {
            entries: HashMap::new(),
            ttl_ms,
        }
    }

    pub fn with_default_ttl() -> ResponseCache<T> {
        ResponseCache::new(DEFAULT_TTL_MS)
    }

    /// Stores a response, replacing any previous entry for the key.
    pub fn insert(&mut self, key: String, value: T, now_ms: f64) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now_ms,
            },
        );
    }

    /// Returns the cached value if it is younger than the TTL. Stale
    /// entries miss but are not removed; the next insert supersedes them.
    pub fn fresh(&self, key: &str, now_ms: f64) -> Option<&T> {
        self.entries
            .get(key)
            .filter(|entry| now_ms - entry.stored_at < self.ttl_ms)
            .map(|entry| &entry.value)
    }

    /// Drops every entry. Used when the source of truth may have changed
    /// out-of-band; invalidation is always wholesale, never per-key.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl_miss_after() {
        let mut cache = ResponseCache::new(1_000.0);
        cache.insert("status=done".into(), 42, 10_000.0);

        assert_eq!(cache.fresh("status=done", 10_500.0), Some(&42));
        // Exactly at the TTL boundary the entry is no longer fresh.
        assert_eq!(cache.fresh("status=done", 11_000.0), None);
        assert_eq!(cache.fresh("status=done", 12_000.0), None);
    }

    #[test]
    fn one_entry_per_key_newer_insert_supersedes() {
        let mut cache = ResponseCache::new(1_000.0);
        cache.insert("q".into(), 1, 0.0);
        cache.insert("q".into(), 2, 500.0);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.fresh("q", 900.0), Some(&2));
    }

    #[test]
    fn distinct_keys_are_independent() {
        let mut cache = ResponseCache::new(1_000.0);
        cache.insert("page=2".into(), 1, 0.0);
        cache.insert("page=3".into(), 2, 0.0);

        assert_eq!(cache.fresh("page=2", 100.0), Some(&1));
        assert_eq!(cache.fresh("page=3", 100.0), Some(&2));
        assert_eq!(cache.fresh("page=4", 100.0), None);
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = ResponseCache::new(1_000.0);
        cache.insert("a".into(), 1, 0.0);
        cache.insert("b".into(), 2, 0.0);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.fresh("a", 1.0), None);
    }
}
