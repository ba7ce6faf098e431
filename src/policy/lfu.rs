//! Least Frequently Used (LFU) Policy
//!
//! Evicts the key with the fewest accesses since admission. Among keys with
//! the same count, the one whose last access is oldest goes first, so LFU
//! degrades to LRU when every key has been touched equally often.
//!
//! # Structure
//!
//! ```text
//!   meta:  key ──▶ LfuMeta { frequency, last_access }
//!   index: (frequency, last_access) ──▶ key      (BTreeMap, ascending)
//!                    ▲
//!              first entry = victim
//! ```
//!
//! `last_access` comes from a logical clock advanced on every access, so index
//! keys never collide.
//!
//! # Performance Characteristics
//!
//! - `record_access`: O(log n)
//! - `choose_victim`: O(log n)
//! - `forget`: O(log n)
//!
//! Counts are not aged. On workloads whose hot set drifts, long-lived keys can
//! outstay their usefulness; that is part of what the benchmark measures.

use crate::meta::LfuMeta;
use crate::HashMap;
use core::fmt;
use core::hash::Hash;
use std::collections::BTreeMap;

/// Least-frequently-used eviction order.
///
/// ```
/// use missbench::policy::{EvictionPolicy, LfuPolicy};
///
/// let mut lfu = LfuPolicy::new();
/// lfu.record_access(&"a");
/// lfu.record_access(&"a");
/// lfu.record_access(&"b");
/// assert_eq!(lfu.choose_victim(), Some("b"));
/// assert_eq!(lfu.frequency(&"a"), Some(2));
/// ```
pub struct LfuPolicy<K> {
    meta: HashMap<K, LfuMeta>,
    index: BTreeMap<(u64, u64), K>,
    clock: u64,
}

impl<K: Hash + Eq + Clone> LfuPolicy<K> {
    /// Creates an empty LFU policy.
    pub fn new() -> Self {
        LfuPolicy {
            meta: HashMap::new(),
            index: BTreeMap::new(),
            clock: 0,
        }
    }

    /// Access count recorded for `key`, if tracked.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.meta.get(key).map(|m| m.frequency)
    }
}

impl<K: Hash + Eq + Clone> Default for LfuPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> super::EvictionPolicy<K> for LfuPolicy<K> {
    fn record_access(&mut self, key: &K) {
        self.clock += 1;
        let now = self.clock;
        match self.meta.get_mut(key) {
            Some(meta) => {
                self.index.remove(&meta.rank());
                meta.touch(now);
                self.index.insert(meta.rank(), key.clone());
            }
            None => {
                let meta = LfuMeta::new(now);
                self.index.insert(meta.rank(), key.clone());
                self.meta.insert(key.clone(), meta);
            }
        }
    }

    fn choose_victim(&mut self) -> Option<K> {
        self.index.values().next().cloned()
    }

    fn forget(&mut self, key: &K) {
        if let Some(meta) = self.meta.remove(key) {
            self.index.remove(&meta.rank());
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.meta.len()
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.meta.contains_key(key)
    }

    fn name(&self) -> &'static str {
        "LFU"
    }
}

impl<K> fmt::Debug for LfuPolicy<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuPolicy")
            .field("len", &self.meta.len())
            .field("clock", &self.clock)
            .finish()
    }
}
