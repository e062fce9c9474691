//! Cache entry and statistics types.

use std::time::{Duration, Instant};

/// An immutable cache entry: a value plus its creation instant.
///
/// Entries are replaced whole on update, never mutated in place, so a getter
/// can hand out a clone of the shared value without copying the payload.
/// The creation instant feeds `age()` for introspection only; content-hashed
/// keys change whenever the content does, so nothing here drives expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    value: T,
    cached_at: Instant,
    ttl: Option<Duration>,
}

impl<T> CacheEntry<T> {
    pub(crate) fn new(value: T, ttl: Option<Duration>) -> Self {
        Self {
            value,
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// Borrow the cached value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take the cached value out of the entry.
    pub fn into_value(self) -> T {
        self.value
    }

    /// How long ago this entry was created.
    pub fn age(&self) -> Duration {
        self.cached_at.elapsed()
    }

    /// Advisory lifetime recorded at insertion, if any. Never enforced.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }
}

/// Hit/miss counters and current size for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
