#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## How a trial fits together
//!
//! ```text
//! ┌──────────────────┐  keys   ┌─────────────────────────────┐  miss  ┌──────────────┐
//! │ WorkloadGenerator│────────▶│ BoundedCache                │───────▶│ Loader       │
//! │  local + outlier │         │  HashMap<K, V>              │        │  MissCounter │
//! └──────────────────┘         │  EvictionPolicy (victims)   │        └──────────────┘
//!          │                   └─────────────────────────────┘                │
//!          │ config                                                           │ value()
//!          ▼                                                                  ▼
//! ┌──────────────────┐                                               observed misses
//! │ OptimalEstimator │──────────────▶ lower bound  ≤ ─────────────────────────┘
//! └──────────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Policy | Victim | Hits reorder? |
//! |--------|--------|---------------|
//! | [`LruPolicy`] | least recently used | yes |
//! | [`LfuPolicy`] | lowest access count, oldest on ties | yes (count) |
//! | [`SlruPolicy`] | probationary LRU, then protected LRU | yes (promotes) |
//! | [`FifoPolicy`] | oldest insertion | no |
//! | [`RandomPolicy`] | uniform, seeded | no |
//!
//! ## Example
//!
//! ```rust
//! use missbench::{
//!     BoundedCache, CountingLoader, LruPolicy, OptimalEstimator, WorkloadConfig,
//!     WorkloadGenerator,
//! };
//!
//! let config = WorkloadConfig::new(1_000, 100, vec![7]).unwrap();
//! let mut cache = BoundedCache::<u64, u64, _, _>::new(
//!     150,
//!     LruPolicy::new(),
//!     CountingLoader::new(|key: &u64| *key),
//! )
//! .unwrap();
//!
//! cache.replay(WorkloadGenerator::generate(&config)).unwrap();
//!
//! let misses = cache.loader().misses();
//! assert!(misses >= OptimalEstimator::lower_bound(&config));
//! assert!(cache.len() <= 150);
//! ```
//!
//! ## Modules
//!
//! - [`workload`]: deterministic key sequences
//! - [`cache`]: the bounded get-or-load cache
//! - [`policy`]: the eviction policy trait and its implementations
//! - [`loader`]: backing loaders and miss counting
//! - [`estimator`]: closed-form lower bound on misses
//! - [`config`]: cache, policy and workload configuration
//! - [`metrics`]: hit/miss/eviction counters
//! - [`error`]: error types

/// Bounded cache with get-or-load semantics.
pub mod cache;

/// Configuration structures and scenario defaults.
pub mod config;

/// Error types.
pub mod error;

/// Lower bound on misses.
pub mod estimator;

/// Index-based doubly linked list backing the ordered policies.
pub(crate) mod list;

/// Backing loaders.
pub mod loader;

/// Per-key policy metadata.
pub mod meta;

/// Metrics collection for cache performance monitoring.
pub mod metrics;

/// Eviction policies.
pub mod policy;

/// Workload generation.
pub mod workload;

/// Key type produced by the workload generator.
pub type Key = u64;

#[cfg(feature = "hashbrown")]
pub(crate) use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
pub(crate) use std::collections::HashMap;

pub use cache::BoundedCache;
pub use config::{CacheConfig, SlruConfig, WorkloadConfig};
pub use error::{CacheError, Result};
pub use estimator::{LowerBound, OptimalEstimator};
pub use loader::{unit_loader, CountingLoader, Loader, MissCounter, Payload};
pub use meta::{LfuMeta, SlruMeta, SlruSegment};
pub use metrics::{CacheMetrics, CoreCacheMetrics};
pub use policy::{EvictionPolicy, FifoPolicy, LfuPolicy, LruPolicy, RandomPolicy, SlruPolicy};
pub use workload::{Access, AccessKind, Accesses, Workload, WorkloadGenerator};
