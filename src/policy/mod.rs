//! Eviction Policies
//!
//! A [`BoundedCache`](crate::BoundedCache) never decides on its own which
//! entry to drop. It reports every access to an [`EvictionPolicy`] and, when
//! an admission would exceed capacity, asks the policy for a victim.
//!
//! ```text
//!   get_or_load(k)
//!        │
//!        ├── hit ──────────────▶ policy.record_access(k)
//!        │
//!        └── miss ─▶ loader.load(k)
//!                      │
//!                      ├── full? ─▶ v = policy.choose_victim()
//!                      │             remove v; policy.forget(v)
//!                      │
//!                      └── insert k ─▶ policy.record_access(k)
//! ```
//!
//! | Policy | Type | Victim |
//! |--------|------|--------|
//! | LRU    | [`LruPolicy`]    | Least recently accessed (reference policy) |
//! | LFU    | [`LfuPolicy`]    | Fewest accesses, oldest among equals |
//! | SLRU   | [`SlruPolicy`]   | LRU of probationary segment, then protected |
//! | FIFO   | [`FifoPolicy`]   | Earliest admitted |
//! | Random | [`RandomPolicy`] | Uniform over resident keys, seeded |
//!
//! # Contract
//!
//! - `record_access(k)` marks `k` as resident (if it was not) and as accessed.
//! - `choose_victim()` names a resident key without removing it; it returns
//!   `None` only when no key is resident.
//! - `forget(k)` drops every trace of `k`; unknown keys are ignored.

pub mod fifo;
pub mod lfu;
pub mod lru;
pub mod random;
pub mod slru;

pub use fifo::FifoPolicy;
pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;
pub use slru::SlruPolicy;

/// Strategy choosing which resident key a bounded cache gives up.
pub trait EvictionPolicy<K> {
    /// Records an access to `key`, admitting it if the policy has not seen it.
    fn record_access(&mut self, key: &K);

    /// Returns the key that should be evicted next, if any key is tracked.
    fn choose_victim(&mut self) -> Option<K>;

    /// Stops tracking `key`.
    fn forget(&mut self, key: &K);

    /// Number of keys currently tracked.
    fn len(&self) -> usize;

    /// Returns `true` if no key is tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` is tracked.
    fn contains(&self, key: &K) -> bool;

    /// Short identifier, e.g. `"LRU"`.
    fn name(&self) -> &'static str;
}

impl<K, P> EvictionPolicy<K> for Box<P>
where
    P: EvictionPolicy<K> + ?Sized,
{
    #[inline]
    fn record_access(&mut self, key: &K) {
        (**self).record_access(key)
    }

    #[inline]
    fn choose_victim(&mut self) -> Option<K> {
        (**self).choose_victim()
    }

    #[inline]
    fn forget(&mut self, key: &K) {
        (**self).forget(key)
    }

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        (**self).contains(key)
    }

    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_victims<P: EvictionPolicy<u64>>(policy: &mut P) -> Vec<u64> {
        let mut order = Vec::new();
        while let Some(victim) = policy.choose_victim() {
            policy.forget(&victim);
            order.push(victim);
        }
        order
    }

    #[test]
    fn test_boxed_policy_delegates() {
        let mut policy: Box<dyn EvictionPolicy<u64>> = Box::new(LruPolicy::new());
        policy.record_access(&1);
        policy.record_access(&2);
        policy.record_access(&1);
        assert_eq!(policy.name(), "LRU");
        assert_eq!(policy.len(), 2);
        assert!(policy.contains(&2));
        assert_eq!(drain_victims(&mut policy), vec![2, 1]);
        assert!(policy.is_empty());
    }

    #[test]
    fn test_every_policy_drains_all_keys() {
        let mut policies: Vec<Box<dyn EvictionPolicy<u64>>> = vec![
            Box::new(LruPolicy::new()),
            Box::new(LfuPolicy::new()),
            Box::new(SlruPolicy::new(2)),
            Box::new(FifoPolicy::new()),
            Box::new(RandomPolicy::with_seed(7)),
        ];
        for policy in policies.iter_mut() {
            for key in [5, 3, 5, 9, 1, 3] {
                policy.record_access(&key);
            }
            assert_eq!(policy.len(), 4, "{}", policy.name());
            let mut victims = drain_victims(policy);
            victims.sort_unstable();
            assert_eq!(victims, vec![1, 3, 5, 9], "{}", policy.name());
        }
    }

    #[test]
    fn test_forget_unknown_key_is_noop() {
        let mut policies: Vec<Box<dyn EvictionPolicy<u64>>> = vec![
            Box::new(LruPolicy::new()),
            Box::new(LfuPolicy::new()),
            Box::new(SlruPolicy::new(1)),
            Box::new(FifoPolicy::new()),
            Box::new(RandomPolicy::with_seed(1)),
        ];
        for policy in policies.iter_mut() {
            policy.record_access(&1);
            policy.forget(&2);
            assert_eq!(policy.len(), 1, "{}", policy.name());
            assert_eq!(policy.choose_victim(), Some(1), "{}", policy.name());
        }
    }
}
