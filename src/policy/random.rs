//! Random Replacement Policy
//!
//! Picks victims uniformly from the resident keys. It keeps no recency or
//! frequency state, which makes it the baseline any smarter policy should beat.
//!
//! Keys live in a dense `Vec`; a map records each key's position so `forget`
//! can `swap_remove` in O(1). The RNG is a seeded [`StdRng`], so two policies
//! built with the same seed and fed the same accesses evict identically.

use crate::HashMap;
use core::fmt;
use core::hash::Hash;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed used by [`RandomPolicy::new`].
pub const DEFAULT_SEED: u64 = 0x5EED;

/// Uniform random eviction.
///
/// ```
/// use missbench::policy::{EvictionPolicy, RandomPolicy};
///
/// let mut a = RandomPolicy::with_seed(42);
/// let mut b = RandomPolicy::with_seed(42);
/// for key in 0..10u64 {
///     a.record_access(&key);
///     b.record_access(&key);
/// }
/// assert_eq!(a.choose_victim(), b.choose_victim());
/// ```
pub struct RandomPolicy<K> {
    keys: Vec<K>,
    index: HashMap<K, usize>,
    rng: StdRng,
}

impl<K: Hash + Eq + Clone> RandomPolicy<K> {
    /// Creates a random policy seeded with [`DEFAULT_SEED`].
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a random policy with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        RandomPolicy {
            keys: Vec::new(),
            index: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<K: Hash + Eq + Clone> Default for RandomPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> super::EvictionPolicy<K> for RandomPolicy<K> {
    fn record_access(&mut self, key: &K) {
        if !self.index.contains_key(key) {
            self.index.insert(key.clone(), self.keys.len());
            self.keys.push(key.clone());
        }
    }

    fn choose_victim(&mut self) -> Option<K> {
        if self.keys.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..self.keys.len());
        Some(self.keys[idx].clone())
    }

    fn forget(&mut self, key: &K) {
        let Some(idx) = self.index.remove(key) else {
            return;
        };
        self.keys.swap_remove(idx);
        if let Some(moved) = self.keys.get(idx) {
            if let Some(slot) = self.index.get_mut(moved) {
                *slot = idx;
            }
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn name(&self) -> &'static str {
        "Random"
    }
}

impl<K> fmt::Debug for RandomPolicy<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomPolicy")
            .field("len", &self.keys.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::EvictionPolicy;

    #[test]
    fn test_random_victim_is_resident() {
        let mut policy = RandomPolicy::with_seed(3);
        for key in 0..50u64 {
            policy.record_access(&key);
        }
        for _ in 0..25 {
            let victim = policy.choose_victim().unwrap();
            assert!(policy.contains(&victim));
            policy.forget(&victim);
            assert!(!policy.contains(&victim));
        }
        assert_eq!(policy.len(), 25);
    }

    #[test]
    fn test_random_forget_keeps_index_consistent() {
        let mut policy = RandomPolicy::new();
        for key in [1, 2, 3, 4] {
            policy.record_access(&key);
        }
        policy.forget(&1);
        policy.forget(&3);
        assert_eq!(policy.len(), 2);
        assert!(policy.contains(&2));
        assert!(policy.contains(&4));
        policy.forget(&4);
        policy.forget(&2);
        assert!(policy.is_empty());
        assert_eq!(policy.choose_victim(), None);
    }

    #[test]
    fn test_random_same_seed_same_sequence() {
        let run = |seed| {
            let mut policy = RandomPolicy::with_seed(seed);
            let mut victims = Vec::new();
            for key in 0..100u64 {
                policy.record_access(&key);
                if policy.len() > 10 {
                    let victim = policy.choose_victim().unwrap();
                    policy.forget(&victim);
                    victims.push(victim);
                }
            }
            victims
        };
        assert_eq!(run(11), run(11));
    }
}
