//! Error types for missbench.
//!
//! Two classes of failure exist:
//!
//! - [`CacheError::InvalidConfiguration`]: a cache or workload was described
//!   with parameters that cannot work (zero capacity, empty modulus list, ...).
//!   Raised at construction time and never recovered internally.
//! - [`CacheError::InvariantViolation`] and [`CacheError::PolicyInconsistency`]:
//!   the cache detected an internal-consistency failure while admitting an
//!   entry. These indicate an eviction-policy bug and abort the trial.
//!
//! There are no transient errors: nothing in the core performs I/O.
//!
//! # Example
//!
//! ```
//! use missbench::{BoundedCache, CacheError, CountingLoader, LruPolicy};
//!
//! let err = BoundedCache::<u64, u64, _, _>::new(
//!     0,
//!     LruPolicy::new(),
//!     CountingLoader::new(|k: &u64| *k),
//! )
//! .unwrap_err();
//! assert!(matches!(err, CacheError::InvalidConfiguration(_)));
//! ```

use thiserror::Error;

/// Errors produced by caches, policies and workload configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Parameters rejected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Resident entry count exceeded the configured capacity after an admission.
    #[error("invariant violation: {resident} resident entries exceed capacity {capacity}")]
    InvariantViolation {
        /// Number of entries resident when the check failed.
        resident: usize,
        /// Configured capacity of the cache.
        capacity: usize,
    },

    /// The eviction policy disagreed with the cache about which keys are resident.
    #[error("eviction policy inconsistency: {0}")]
    PolicyInconsistency(String),
}

impl CacheError {
    /// Shorthand for building an [`CacheError::InvalidConfiguration`].
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CacheError::InvalidConfiguration(msg.into())
    }

    /// Returns `true` for errors that must abort the running trial.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CacheError::InvalidConfiguration(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, CacheError>;
