//! Least Recently Used (LRU) Policy
//!
//! The reference eviction policy. Keys are kept in a single recency list;
//! every access (a hit, or the insertion that follows a miss) moves the key to
//! the front, and the victim is always the key at the back.
//!
//! # Algorithm
//!
//! ```text
//!   front (MRU)                               back (LRU)
//!     [k4] ◀──▶ [k1] ◀──▶ [k7] ◀──▶ [k2]
//!                                     ▲
//!                                choose_victim
//! ```
//!
//! Recency is a total order, so a tie can only arise between keys that were
//! never touched after admission; those sit in admission order and the
//! earliest admitted is evicted first.
//!
//! # Performance Characteristics
//!
//! - `record_access`: O(1)
//! - `choose_victim`: O(1)
//! - `forget`: O(1)

use crate::config::MAX_PREALLOCATION;
use crate::list::{Handle, List};
use crate::HashMap;
use core::fmt;
use core::hash::Hash;

/// Least-recently-used eviction order.
///
/// # Examples
///
/// ```
/// use missbench::policy::{EvictionPolicy, LruPolicy};
///
/// let mut lru = LruPolicy::new();
/// lru.record_access(&"apple");
/// lru.record_access(&"banana");
/// lru.record_access(&"apple");
/// assert_eq!(lru.choose_victim(), Some("banana"));
/// ```
pub struct LruPolicy<K> {
    list: List<K>,
    map: HashMap<K, Handle>,
}

impl<K: Hash + Eq + Clone> LruPolicy<K> {
    /// Creates an empty LRU policy.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty LRU policy sized for `cap` keys. Very large sizes
    /// are reserved partially and grow on demand.
    pub fn with_capacity(cap: usize) -> Self {
        LruPolicy {
            list: List::with_capacity(cap),
            map: HashMap::with_capacity(cap.min(MAX_PREALLOCATION)),
        }
    }

    /// Keys from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.list.iter()
    }
}

impl<K: Hash + Eq + Clone> Default for LruPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> super::EvictionPolicy<K> for LruPolicy<K> {
    fn record_access(&mut self, key: &K) {
        if let Some(&handle) = self.map.get(key) {
            self.list.move_to_front(handle);
        } else {
            let handle = self.list.push_front(key.clone());
            self.map.insert(key.clone(), handle);
        }
    }

    #[inline]
    fn choose_victim(&mut self) -> Option<K> {
        self.list.back().cloned()
    }

    fn forget(&mut self, key: &K) {
        if let Some(handle) = self.map.remove(key) {
            self.list.remove(handle);
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn name(&self) -> &'static str {
        "LRU"
    }
}

impl<K> fmt::Debug for LruPolicy<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruPolicy")
            .field("len", &self.list.len())
            .finish()
    }
}
