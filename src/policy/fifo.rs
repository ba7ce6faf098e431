//! First In, First Out (FIFO) Policy
//!
//! Evicts keys in the order they were admitted. Hits do not reorder anything,
//! which makes FIFO a useful contrast to LRU on workloads with a sliding
//! working set.

use crate::list::{Handle, List};
use crate::HashMap;
use core::fmt;
use core::hash::Hash;

/// Admission-order eviction.
///
/// ```
/// use missbench::policy::{EvictionPolicy, FifoPolicy};
///
/// let mut fifo = FifoPolicy::new();
/// fifo.record_access(&1);
/// fifo.record_access(&2);
/// fifo.record_access(&1);
/// assert_eq!(fifo.choose_victim(), Some(1));
/// ```
pub struct FifoPolicy<K> {
    queue: List<K>,
    map: HashMap<K, Handle>,
}

impl<K: Hash + Eq + Clone> FifoPolicy<K> {
    /// Creates an empty FIFO policy.
    pub fn new() -> Self {
        FifoPolicy {
            queue: List::new(),
            map: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> Default for FifoPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> super::EvictionPolicy<K> for FifoPolicy<K> {
    fn record_access(&mut self, key: &K) {
        if !self.map.contains_key(key) {
            let handle = self.queue.push_front(key.clone());
            self.map.insert(key.clone(), handle);
        }
    }

    #[inline]
    fn choose_victim(&mut self) -> Option<K> {
        self.queue.back().cloned()
    }

    fn forget(&mut self, key: &K) {
        if let Some(handle) = self.map.remove(key) {
            self.queue.remove(handle);
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
        "FIFO"
    }
}

impl<K> fmt::Debug for FifoPolicy<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoPolicy")
            .field("len", &self.queue.len())
            .finish()
    }
}
