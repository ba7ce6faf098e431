//! Cache Metrics
//!
//! Counters recorded by [`BoundedCache`](crate::BoundedCache) and reported as a
//! `BTreeMap<String, f64>` so that the output order is deterministic, which
//! keeps benchmark reports reproducible and easy to diff.
//!
//! The loader's [`MissCounter`](crate::MissCounter) is the authoritative miss
//! count; `misses` here is the cache's own view and the two must agree.

use std::collections::BTreeMap;

/// Counters common to every bounded cache, regardless of eviction policy.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total `get_or_load` calls.
    pub requests: u64,

    /// Requests answered from a resident entry.
    pub cache_hits: u64,

    /// Requests that invoked the loader.
    pub cache_misses: u64,

    /// Entries removed to make room for an admission.
    pub evictions: u64,

    /// Largest resident count observed.
    pub peak_len: usize,
}

impl CoreCacheMetrics {
    /// Creates zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cache hit.
    #[inline]
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a cache miss.
    #[inline]
    pub fn record_miss(&mut self) {
        self.requests += 1;
        self.cache_misses += 1;
    }

    /// Records an eviction.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records the resident count after an admission.
    #[inline]
    pub fn record_len(&mut self, len: usize) {
        self.peak_len = self.peak_len.max(len);
    }

    /// Hit rate in `0.0..=1.0`, or 0.0 before any request.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Miss rate in `0.0..=1.0`, or 0.0 before any request.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("peak_len".to_string(), self.peak_len as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics access across caches.
pub trait CacheMetrics {
    /// All metrics, keyed alphabetically.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Name of the eviction algorithm, e.g. `"LRU"`.
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let mut m = CoreCacheMetrics::new();
        assert_eq!(m.hit_rate(), 0.0);
        assert_eq!(m.miss_rate(), 0.0);

        m.record_miss();
        m.record_hit();
        m.record_hit();
        m.record_hit();
        assert_eq!(m.requests, 4);
        assert_eq!(m.hit_rate(), 0.75);
        assert_eq!(m.miss_rate(), 0.25);
    }

    #[test]
    fn test_btreemap_is_ordered_and_complete() {
        let mut m = CoreCacheMetrics::new();
        m.record_miss();
        m.record_eviction();
        m.record_len(3);
        m.record_len(2);

        let map = m.to_btreemap();
        let keys: Vec<_> = map.keys().cloned().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(map["cache_misses"], 1.0);
        assert_eq!(map["evictions"], 1.0);
        assert_eq!(map["peak_len"], 3.0);
        assert_eq!(map["eviction_rate"], 1.0);
    }
}
