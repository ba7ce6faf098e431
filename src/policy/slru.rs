//! Segmented Least Recently Used (SLRU) Policy
//!
//! SLRU splits resident keys into a **probationary** segment for keys seen
//! once and a **protected** segment for keys hit again while resident. A burst
//! of one-time keys (outliers, scans) can only displace probationary keys.
//!
//! ## Segment Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PROTECTED     MRU ◀──▶ [hot_1] ◀──▶ ... ◀──▶ [demote] LRU   │
//! │                              │ demote           ▲ promote    │
//! │                              ▼                  │            │
//! │  PROBATIONARY  MRU ◀──▶ [new_1] ◀──▶ ... ◀──▶ [evict]  LRU   │
//! │                    ▲                                         │
//! │                    │ admit                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry Lifecycle
//!
//! 1. **Admit**: new keys enter the probationary front.
//! 2. **Hit in probationary**: key is promoted to the protected front.
//! 3. **Protected overflow**: the protected LRU key is demoted to the
//!    probationary front.
//! 4. **Victim**: probationary LRU; protected LRU only when probationary is empty.
//!
//! The protected limit is enforced by demotion, never by eviction, so the
//! policy tracks exactly the keys the cache holds.

use crate::config::SlruConfig;
use crate::list::List;
use crate::meta::{SlruMeta, SlruSegment};
use crate::HashMap;
use core::fmt;
use core::hash::Hash;

/// Segmented LRU eviction order.
///
/// ```
/// use missbench::policy::{EvictionPolicy, SlruPolicy};
///
/// let mut slru = SlruPolicy::new(1);
/// slru.record_access(&"hot");
/// slru.record_access(&"hot"); // promoted
/// slru.record_access(&"scan");
/// assert_eq!(slru.choose_victim(), Some("scan"));
/// ```
pub struct SlruPolicy<K> {
    probationary: List<K>,
    protected: List<K>,
    map: HashMap<K, SlruMeta>,
    protected_capacity: usize,
}

impl<K: Hash + Eq + Clone> SlruPolicy<K> {
    /// Creates an SLRU policy whose protected segment holds up to
    /// `protected_capacity` keys. Zero is raised to one.
    pub fn new(protected_capacity: usize) -> Self {
        SlruPolicy {
            probationary: List::new(),
            protected: List::new(),
            map: HashMap::new(),
            protected_capacity: protected_capacity.max(1),
        }
    }

    /// Creates an SLRU policy from a config.
    pub fn init(config: SlruConfig) -> Self {
        Self::new(config.protected_capacity.get())
    }

    /// Maximum size of the protected segment.
    #[inline]
    pub fn protected_capacity(&self) -> usize {
        self.protected_capacity
    }

    /// Number of keys in the protected segment.
    #[inline]
    pub fn protected_len(&self) -> usize {
        self.protected.len()
    }

    /// Number of keys in the probationary segment.
    #[inline]
    pub fn probationary_len(&self) -> usize {
        self.probationary.len()
    }

    /// Segment currently holding `key`.
    pub fn segment_of(&self, key: &K) -> Option<SlruSegment> {
        self.map.get(key).map(|meta| meta.segment)
    }

    fn promote(&mut self, key: &K, handle: usize) {
        self.probationary.remove(handle);
        let handle = self.protected.push_front(key.clone());
        self.map
            .insert(key.clone(), SlruMeta::new(SlruSegment::Protected, handle));

        if self.protected.len() > self.protected_capacity {
            if let Some(demoted) = self.protected.pop_back() {
                let handle = self.probationary.push_front(demoted.clone());
                self.map
                    .insert(demoted, SlruMeta::new(SlruSegment::Probationary, handle));
            }
        }
    }
}

impl<K: Hash + Eq + Clone> super::EvictionPolicy<K> for SlruPolicy<K> {
    fn record_access(&mut self, key: &K) {
        match self.map.get(key).copied() {
            Some(SlruMeta {
                segment: SlruSegment::Protected,
                handle,
            }) => self.protected.move_to_front(handle),
            Some(SlruMeta {
                segment: SlruSegment::Probationary,
                handle,
            }) => self.promote(key, handle),
            None => {
                let handle = self.probationary.push_front(key.clone());
                self.map.insert(
                    key.clone(),
                    SlruMeta::new(SlruSegment::Probationary, handle),
                );
            }
        }
    }

    fn choose_victim(&mut self) -> Option<K> {
        self.probationary
            .back()
            .or_else(|| self.protected.back())
            .cloned()
    }

    fn forget(&mut self, key: &K) {
        if let Some(meta) = self.map.remove(key) {
            match meta.segment {
                SlruSegment::Probationary => self.probationary.remove(meta.handle),
                SlruSegment::Protected => self.protected.remove(meta.handle),
            };
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
        "SLRU"
    }
}

impl<K> fmt::Debug for SlruPolicy<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlruPolicy")
            .field("probationary", &self.probationary.len())
            .field("protected", &self.protected.len())
            .field("protected_capacity", &self.protected_capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::EvictionPolicy;
    use core::num::NonZeroUsize;

    #[test]
    fn test_slru_promotion_on_second_access() {
        let mut slru = SlruPolicy::new(2);
        slru.record_access(&1);
        assert_eq!(slru.segment_of(&1), Some(SlruSegment::Probationary));
        slru.record_access(&1);
        assert_eq!(slru.segment_of(&1), Some(SlruSegment::Protected));
        assert_eq!(slru.protected_len(), 1);
        assert_eq!(slru.probationary_len(), 0);
    }

    #[test]
    fn test_slru_victims_come_from_probationary_first() {
        let mut slru = SlruPolicy::new(2);
        slru.record_access(&1);
        slru.record_access(&1);
        slru.record_access(&2);
        slru.record_access(&3);
        assert_eq!(slru.choose_victim(), Some(2));
        slru.forget(&2);
        assert_eq!(slru.choose_victim(), Some(3));
        slru.forget(&3);
        assert_eq!(slru.choose_victim(), Some(1));
    }

    #[test]
    fn test_slru_protected_overflow_demotes() {
        let mut slru = SlruPolicy::init(SlruConfig {
            protected_capacity: NonZeroUsize::new(2).unwrap(),
        });
        for key in [1, 2, 3] {
            slru.record_access(&key);
            slru.record_access(&key);
        }
        // 1 was the protected LRU when 3 got promoted
        assert_eq!(slru.segment_of(&1), Some(SlruSegment::Probationary));
        assert_eq!(slru.segment_of(&2), Some(SlruSegment::Protected));
        assert_eq!(slru.segment_of(&3), Some(SlruSegment::Protected));
        assert_eq!(slru.len(), 3);
        assert_eq!(slru.choose_victim(), Some(1));
    }

    #[test]
    fn test_slru_protected_hit_refreshes_recency() {
        let mut slru = SlruPolicy::new(2);
        for key in [1, 2] {
            slru.record_access(&key);
            slru.record_access(&key);
        }
        slru.record_access(&1);
        slru.record_access(&3);
        slru.record_access(&3);
        assert_eq!(slru.segment_of(&2), Some(SlruSegment::Probationary));
        assert_eq!(slru.segment_of(&1), Some(SlruSegment::Protected));
    }

    #[test]
    fn test_slru_zero_protected_capacity_is_raised() {
        let slru: SlruPolicy<u64> = SlruPolicy::new(0);
        assert_eq!(slru.protected_capacity(), 1);
    }
}
