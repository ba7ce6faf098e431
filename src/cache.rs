//! Bounded Get-or-Load Cache
//!
//! [`BoundedCache`] is a fixed-capacity associative store in front of a
//! [`Loader`]. Lookups that find a resident entry return it without touching
//! the loader; lookups that miss call the loader exactly once and admit the
//! result, evicting one victim chosen by the [`EvictionPolicy`] first if the
//! cache is full.
//!
//! # Invariants
//!
//! Checked after every admission:
//!
//! - `len() <= capacity()`; a breach is reported as
//!   [`CacheError::InvariantViolation`].
//! - the policy tracks exactly the resident keys; a mismatch, a missing
//!   victim, or a non-resident victim is reported as
//!   [`CacheError::PolicyInconsistency`].
//!
//! Either error means the policy is broken and the trial must stop.
//!
//! # Thread Safety
//!
//! Not thread-safe, and not meant to be shared: each benchmark trial builds
//! its own cache, drives one workload through it and drops it.

use crate::config::{CacheConfig, MAX_PREALLOCATION};
use crate::error::{CacheError, Result};
use crate::loader::Loader;
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::policy::EvictionPolicy;
use crate::HashMap;
use core::fmt;
use core::hash::Hash;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// A fixed-capacity cache with get-or-load semantics and a pluggable
/// eviction policy.
///
/// # Examples
///
/// ```
/// use missbench::{BoundedCache, CountingLoader, LruPolicy};
///
/// let loader = CountingLoader::new(|key: &u64| key * 10);
/// let mut cache = BoundedCache::<u64, u64, _, _>::new(2, LruPolicy::new(), loader).unwrap();
///
/// assert_eq!(*cache.get_or_load(1).unwrap(), 10); // miss
/// assert_eq!(*cache.get_or_load(2).unwrap(), 20); // miss
/// assert_eq!(*cache.get_or_load(1).unwrap(), 10); // hit
/// assert_eq!(*cache.get_or_load(3).unwrap(), 30); // miss, evicts 2
///
/// assert_eq!(cache.len(), 2);
/// assert!(!cache.contains(&2));
/// assert_eq!(cache.loader().misses(), 3);
/// ```
pub struct BoundedCache<K, V, P, L> {
    config: CacheConfig,
    map: HashMap<K, V>,
    policy: P,
    loader: L,
    metrics: CoreCacheMetrics,
}

impl<K, V, P, L> BoundedCache<K, V, P, L>
where
    K: Hash + Eq + Clone,
    P: EvictionPolicy<K>,
    L: Loader<K, V>,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfiguration`] if `capacity` is zero.
    pub fn new(capacity: usize, policy: P, loader: L) -> Result<Self> {
        Ok(Self::init(CacheConfig::with_capacity(capacity)?, policy, loader))
    }

    /// Creates a cache from a validated config.
    pub fn init(config: CacheConfig, policy: P, loader: L) -> Self {
        debug!(
            capacity = config.capacity.get(),
            policy = policy.name(),
            "bounded cache created"
        );
        BoundedCache {
            config,
            map: HashMap::with_capacity(config.capacity.get().min(MAX_PREALLOCATION)),
            policy,
            loader,
            metrics: CoreCacheMetrics::new(),
        }
    }

    /// Returns the value for `key`, loading and admitting it on a miss.
    ///
    /// A hit refreshes the key in the policy and leaves the loader untouched.
    /// A miss calls the loader once; if the cache is full, one victim is
    /// evicted before the new entry is inserted, so the resident count never
    /// exceeds the capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvariantViolation`] or
    /// [`CacheError::PolicyInconsistency`] if the admission left the cache in
    /// an inconsistent state.
    pub fn get_or_load(&mut self, key: K) -> Result<&V> {
        if self.map.contains_key(&key) {
            self.policy.record_access(&key);
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
            let value = self.loader.load(&key);
            if self.map.len() >= self.config.capacity.get() {
                self.evict_one()?;
            }
            self.map.insert(key.clone(), value);
            self.policy.record_access(&key);
            self.check_invariants()?;
            self.metrics.record_len(self.map.len());
        }

        self.map.get(&key).ok_or_else(|| {
            CacheError::PolicyInconsistency("admitted entry is not resident".to_string())
        })
    }

    /// Feeds every key of `keys` through [`get_or_load`](Self::get_or_load),
    /// stopping at the first error. Returns the number of requests served.
    pub fn replay<I>(&mut self, keys: I) -> Result<u64>
    where
        I: IntoIterator<Item = K>,
    {
        let mut served = 0;
        for key in keys {
            self.get_or_load(key)?;
            served += 1;
        }
        Ok(served)
    }

    fn evict_one(&mut self) -> Result<()> {
        let resident = self.map.len();
        let victim = self.policy.choose_victim().ok_or_else(|| {
            CacheError::PolicyInconsistency(format!(
                "{} returned no victim with {resident} resident entries",
                self.policy.name()
            ))
        })?;
        if self.map.remove(&victim).is_none() {
            return Err(CacheError::PolicyInconsistency(format!(
                "{} chose a victim that is not resident",
                self.policy.name()
            )));
        }
        self.policy.forget(&victim);
        self.metrics.record_eviction();
        trace!(resident = self.map.len(), "evicted one entry");
        Ok(())
    }

    fn check_invariants(&self) -> Result<()> {
        let capacity = self.config.capacity.get();
        let resident = self.map.len();
        if resident > capacity {
            return Err(CacheError::InvariantViolation { resident, capacity });
        }
        let tracked = self.policy.len();
        if tracked != resident {
            return Err(CacheError::PolicyInconsistency(format!(
                "{} tracks {tracked} keys but {resident} are resident",
                self.policy.name()
            )));
        }
        Ok(())
    }
}

impl<K: Hash + Eq, V, P, L> BoundedCache<K, V, P, L> {
    /// Number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing is resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of resident entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity.get()
    }

    /// Returns `true` if `key` is resident. Does not count as an access.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the resident value for `key` without recording an access.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    /// The eviction policy.
    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// The backing loader.
    #[inline]
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Hit/miss/eviction counters.
    #[inline]
    pub fn stats(&self) -> &CoreCacheMetrics {
        &self.metrics
    }

    /// Consumes the cache, returning its loader.
    pub fn into_loader(self) -> L {
        self.loader
    }
}

impl<K, V, P, L> CacheMetrics for BoundedCache<K, V, P, L>
where
    K: Hash + Eq,
    P: EvictionPolicy<K>,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.metrics.to_btreemap();
        metrics.insert("capacity".to_string(), self.config.capacity.get() as f64);
        metrics.insert("len".to_string(), self.map.len() as f64);
        metrics
    }

    fn algorithm_name(&self) -> &'static str {
        self.policy.name()
    }
}

impl<K, V, P, L> fmt::Debug for BoundedCache<K, V, P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("capacity", &self.config.capacity)
            .field("len", &self.map.len())
            .field("metrics", &self.metrics)
            .finish()
    }
}
