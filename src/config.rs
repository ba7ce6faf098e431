//! Configuration Module
//!
//! Configuration structures for caches, policies and workloads.
//!
//! Cache and policy configs follow the plain-struct pattern: all fields are
//! public and typed so that invalid values are unrepresentable
//! (`NonZeroUsize` for capacities). [`WorkloadConfig`] is different: it is
//! immutable once built, so it validates its parameters in
//! [`WorkloadConfig::new`] and exposes read-only accessors.
//!
//! # Examples
//!
//! ```
//! use missbench::config::{CacheConfig, WorkloadConfig};
//! use core::num::NonZeroUsize;
//!
//! let cache = CacheConfig {
//!     capacity: NonZeroUsize::new(150).unwrap(),
//! };
//! assert_eq!(cache.capacity.get(), 150);
//!
//! let workload = WorkloadConfig::new(10_000, 100, vec![101]).unwrap();
//! assert_eq!(workload.outlier_offset(), 20_000);
//! assert_eq!(workload.max_local_key(), 10_099);
//! ```

use crate::error::{CacheError, Result};
use crate::Key;
use core::fmt;
use core::num::NonZeroUsize;

/// Default outer iteration count.
pub const DEFAULT_OUTER: u64 = 10_000;

/// Default inner range width.
pub const DEFAULT_INNER: u64 = 100;

/// First outlier key when the local key range leaves room for it.
pub const DEFAULT_OUTLIER_OFFSET: Key = 20_000;

/// Capacity used by the reference benchmark scenario.
pub const DEFAULT_CAPACITY: usize = 150;

/// Moduli swept by the reference benchmark scenario, widest period first.
pub const DEFAULT_MODULI: [u64; 16] = [101, 55, 49, 31, 23, 17, 11, 9, 8, 7, 6, 5, 4, 3, 2, 1];

/// Upper bound on slots reserved up front; larger caches grow on demand.
pub(crate) const MAX_PREALLOCATION: usize = 1 << 16;

/// Configuration for a [`BoundedCache`](crate::BoundedCache).
///
/// # Fields
///
/// - `capacity`: Maximum number of resident entries.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
}

impl CacheConfig {
    /// Builds a config from a raw capacity, rejecting zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| CacheError::invalid("cache capacity must be greater than zero"))?;
        Ok(Self { capacity })
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// Configuration for an [`SlruPolicy`](crate::policy::SlruPolicy).
///
/// The protected segment holds keys that were accessed at least twice while
/// resident. Keys evicted from it are demoted to the probationary segment
/// rather than dropped.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SlruConfig {
    /// Maximum number of keys kept in the protected segment.
    pub protected_capacity: NonZeroUsize,
}

impl SlruConfig {
    /// Sizes the protected segment at 20% of `capacity`, with a floor of one.
    pub fn for_capacity(capacity: NonZeroUsize) -> Self {
        let protected = (capacity.get() / 5).max(1);
        Self {
            protected_capacity: NonZeroUsize::new(protected).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl fmt::Debug for SlruConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlruConfig")
            .field("protected_capacity", &self.protected_capacity)
            .finish()
    }
}

/// Shape of a synthetic workload.
///
/// The workload visits every `(i, j)` with `i` in `0..outer` and `j` in
/// `1..=inner`. Each pair touches local key `i + j`, then one fresh outlier key
/// per modulus `m` with `j % m == 0`.
///
/// Local keys lie in `1..=outer + inner - 1`; outlier keys start at
/// [`outlier_offset`](Self::outlier_offset), which must sit strictly above the
/// local range so the two never collide.
#[derive(Clone, PartialEq, Eq)]
pub struct WorkloadConfig {
    outer: u64,
    inner: u64,
    moduli: Vec<u64>,
    outlier_offset: Key,
}

impl WorkloadConfig {
    /// Creates a workload config with the derived default outlier offset.
    ///
    /// The offset is [`DEFAULT_OUTLIER_OFFSET`] unless the local key range
    /// reaches it, in which case the first key past the local range is used.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfiguration`] if `outer` or `inner` is
    /// zero, `moduli` is empty or contains a zero, or the key space would
    /// overflow `u64`.
    pub fn new(outer: u64, inner: u64, moduli: Vec<u64>) -> Result<Self> {
        let first_free = Self::local_key_end(outer, inner)?;
        Self::build(outer, inner, moduli, DEFAULT_OUTLIER_OFFSET.max(first_free))
    }

    /// Returns a copy of this config with a different first outlier key.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfiguration`] if `offset` falls inside the
    /// local key range or the outlier stream would overflow `u64`.
    pub fn with_outlier_offset(self, offset: Key) -> Result<Self> {
        Self::build(self.outer, self.inner, self.moduli, offset)
    }

    fn build(outer: u64, inner: u64, moduli: Vec<u64>, outlier_offset: Key) -> Result<Self> {
        if moduli.is_empty() {
            return Err(CacheError::invalid("modulus list must not be empty"));
        }
        if moduli.contains(&0) {
            return Err(CacheError::invalid("moduli must be greater than zero"));
        }
        let first_free = Self::local_key_end(outer, inner)?;
        if outlier_offset < first_free {
            return Err(CacheError::invalid(format!(
                "outlier offset {outlier_offset} overlaps local keys 1..={}",
                first_free - 1
            )));
        }

        let config = Self {
            outer,
            inner,
            moduli,
            outlier_offset,
        };
        let outliers = config
            .checked_outlier_count()
            .ok_or_else(|| CacheError::invalid("outlier count overflows u64"))?;
        outlier_offset
            .checked_add(outliers)
            .ok_or_else(|| CacheError::invalid("outlier keys overflow u64"))?;
        config
            .outer
            .checked_mul(config.inner)
            .and_then(|local| local.checked_add(outliers))
            .ok_or_else(|| CacheError::invalid("total access count overflows u64"))?;
        Ok(config)
    }

    /// One past the largest local key, validating the loop bounds.
    fn local_key_end(outer: u64, inner: u64) -> Result<Key> {
        if outer == 0 {
            return Err(CacheError::invalid("outer iteration count must be greater than zero"));
        }
        if inner == 0 {
            return Err(CacheError::invalid("inner range width must be greater than zero"));
        }
        outer
            .checked_add(inner)
            .ok_or_else(|| CacheError::invalid("local key range overflows u64"))
    }

    fn checked_outlier_count(&self) -> Option<u64> {
        let per_outer = self
            .moduli
            .iter()
            .try_fold(0u64, |acc, &m| acc.checked_add(self.inner / m))?;
        per_outer.checked_mul(self.outer)
    }

    /// Outer iteration count.
    #[inline]
    pub fn outer(&self) -> u64 {
        self.outer
    }

    /// Inner range width.
    #[inline]
    pub fn inner(&self) -> u64 {
        self.inner
    }

    /// Outlier injection periods, in emission order.
    #[inline]
    pub fn moduli(&self) -> &[u64] {
        &self.moduli
    }

    /// First outlier key.
    #[inline]
    pub fn outlier_offset(&self) -> Key {
        self.outlier_offset
    }

    /// Largest local key the workload touches.
    #[inline]
    pub fn max_local_key(&self) -> Key {
        self.outer + self.inner - 1
    }

    /// Number of distinct local keys touched over the whole workload.
    #[inline]
    pub fn distinct_local_keys(&self) -> u64 {
        self.outer + self.inner - 1
    }

    /// Number of outlier keys emitted over the whole workload.
    pub fn outlier_count(&self) -> u64 {
        // validated in `build`
        let per_outer: u64 = self.moduli.iter().map(|&m| self.inner / m).sum();
        per_outer * self.outer
    }

    /// Total number of keys emitted by the workload.
    pub fn total_accesses(&self) -> u64 {
        self.outer * self.inner + self.outlier_count()
    }
}

impl Default for WorkloadConfig {
    /// 10,000 × 100 with the single modulus 101, which never injects outliers.
    fn default() -> Self {
        Self {
            outer: DEFAULT_OUTER,
            inner: DEFAULT_INNER,
            moduli: vec![DEFAULT_MODULI[0]],
            outlier_offset: DEFAULT_OUTLIER_OFFSET,
        }
    }
}

impl fmt::Debug for WorkloadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkloadConfig")
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .field("moduli", &self.moduli)
            .field("outlier_offset", &self.outlier_offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_rejects_zero() {
        assert!(matches!(
            CacheConfig::with_capacity(0),
            Err(CacheError::InvalidConfiguration(_))
        ));
        assert_eq!(CacheConfig::with_capacity(150).unwrap().capacity.get(), 150);
    }

    #[test]
    fn test_slru_config_for_capacity() {
        let config = SlruConfig::for_capacity(NonZeroUsize::new(150).unwrap());
        assert_eq!(config.protected_capacity.get(), 30);
        let config = SlruConfig::for_capacity(NonZeroUsize::new(1).unwrap());
        assert_eq!(config.protected_capacity.get(), 1);
    }

    #[test]
    fn test_workload_config_defaults() {
        let config = WorkloadConfig::default();
        assert_eq!(config.outer(), 10_000);
        assert_eq!(config.inner(), 100);
        assert_eq!(config.moduli(), &[101]);
        assert_eq!(config.outlier_offset(), 20_000);
        assert_eq!(config, WorkloadConfig::new(10_000, 100, vec![101]).unwrap());
    }

    #[test]
    fn test_workload_config_validation() {
        assert!(WorkloadConfig::new(0, 100, vec![1]).is_err());
        assert!(WorkloadConfig::new(100, 0, vec![1]).is_err());
        assert!(WorkloadConfig::new(100, 100, vec![]).is_err());
        assert!(WorkloadConfig::new(100, 100, vec![3, 0]).is_err());
        assert!(WorkloadConfig::new(u64::MAX, 2, vec![1]).is_err());
    }

    #[test]
    fn test_outlier_offset_follows_local_range() {
        let config = WorkloadConfig::new(50_000, 100, vec![7]).unwrap();
        assert_eq!(config.outlier_offset(), 50_100);
        assert!(config.outlier_offset() > config.max_local_key());

        let config = WorkloadConfig::new(10, 10, vec![2]).unwrap();
        assert!(config.clone().with_outlier_offset(19).is_err());
        assert_eq!(config.with_outlier_offset(20).unwrap().outlier_offset(), 20);
    }

    #[test]
    fn test_workload_counts() {
        let config = WorkloadConfig::new(10_000, 100, vec![1]).unwrap();
        assert_eq!(config.outlier_count(), 1_000_000);
        assert_eq!(config.total_accesses(), 2_000_000);
        assert_eq!(config.distinct_local_keys(), 10_099);

        let config = WorkloadConfig::new(3, 10, vec![2, 5]).unwrap();
        // per outer step: 5 (j = 2,4,6,8,10) + 2 (j = 5,10)
        assert_eq!(config.outlier_count(), 21);
        assert_eq!(config.total_accesses(), 51);
    }
}
