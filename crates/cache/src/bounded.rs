//! Fixed-capacity concurrent cache over the `lru` primitive.

use crate::entry::{CacheEntry, CacheStats};
use lru::LruCache;
use parking_lot::Mutex;
use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A bounded, thread-safe cache.
///
/// Capacity is fixed at construction; inserting past it evicts the least
/// recently used entry. A capacity of zero disables the cache entirely:
/// every lookup is a miss and every mutation a no-op, which lets a
/// deployment switch off caching for one artifact kind without touching
/// call sites.
///
/// Critical sections are a single map operation; callers never hold the
/// lock across their own work.
pub struct BoundedCache<K, V> {
    inner: Option<Mutex<LruCache<K, CacheEntry<V>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Hash + Eq, V: Clone> BoundedCache<K, V> {
    /// Create a cache holding at most `capacity` entries. Zero disables it.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache on which every operation is a no-op.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Whether this cache was given a non-zero capacity.
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Look up an entry, marking it recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self
            .inner
            .as_ref()
            .and_then(|inner| inner.lock().get(key).cloned());
        match entry {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or overwrite an entry stamped with the current instant.
    pub fn put(&self, key: K, value: V) {
        self.put_with_ttl(key, value, None);
    }

    /// Insert or overwrite an entry carrying an advisory ttl.
    pub fn put_with_ttl(&self, key: K, value: V, ttl: Option<Duration>) {
        if let Some(inner) = &self.inner {
            inner.lock().put(key, CacheEntry::new(value, ttl));
        }
    }

    /// Drop an entry if present.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(inner) = &self.inner {
            inner.lock().pop(key);
        }
    }

    /// Drop every entry.
    pub fn purge(&self) {
        if let Some(inner) = &self.inner {
            inner.lock().clear();
        }
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counter snapshot for introspection.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_get_put_remove() {
        let cache: BoundedCache<String, u32> = BoundedCache::new(4);
        assert!(cache.get("a").is_none());

        cache.put("a".to_string(), 1);
        assert_eq!(cache.get("a").map(|e| *e.value()), Some(1));

        cache.put("a".to_string(), 2);
        assert_eq!(cache.get("a").map(|e| *e.value()), Some(2));

        cache.remove("a");
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_bound_holds() {
        let cache: BoundedCache<u32, u32> = BoundedCache::new(3);
        for key in 0..10 {
            cache.put(key, key);
        }
        assert_eq!(cache.len(), 3);
        // The newest keys survive.
        assert!(cache.get(&9).is_some());
        assert!(cache.get(&0).is_none());
    }

    #[test]
    fn test_recently_used_entry_survives_eviction() {
        let cache: BoundedCache<u32, u32> = BoundedCache::new(2);
        cache.put(1, 1);
        cache.put(2, 2);
        // Touch 1 so 2 becomes the eviction candidate.
        assert!(cache.get(&1).is_some());
        cache.put(3, 3);
        assert!(cache.get(&1).is_some());
        assert!(cache.get(&2).is_none());
    }

    #[test]
    fn test_disabled_cache_is_inert() {
        let cache: BoundedCache<String, u32> = BoundedCache::disabled();
        assert!(!cache.is_enabled());

        cache.put("a".to_string(), 1);
        assert!(cache.get("a").is_none());
        cache.remove("a");
        cache.purge();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_purge_drops_everything() {
        let cache: BoundedCache<u32, u32> = BoundedCache::new(8);
        for key in 0..5 {
            cache.put(key, key);
        }
        cache.purge();
        assert!(cache.is_empty());
        assert!(cache.get(&0).is_none());
    }

    #[test]
    fn test_stats_count_hits_and_misses() {
        let cache: BoundedCache<u32, u32> = BoundedCache::new(2);
        cache.put(1, 1);
        assert!(cache.get(&1).is_some());
        assert!(cache.get(&2).is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.len, 1);
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(capacity in 1usize..32, extra in 0usize..64) {
            let cache: BoundedCache<usize, usize> = BoundedCache::new(capacity);
            for key in 0..capacity + extra {
                cache.put(key, key);
            }
            prop_assert_eq!(cache.len(), capacity);
        }
    }
}
