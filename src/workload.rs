//! Deterministic Workload Generation
//!
//! The benchmark workload mixes a sliding window of reused keys with a
//! stream of keys that are each touched exactly once:
//!
//! ```text
//!   for i in 0..outer
//!     for j in 1..=inner
//!       emit i + j                      local key, reused across i
//!       for m in moduli
//!         if j % m == 0: emit outlier   fresh key, never seen again
//! ```
//!
//! Local keys form a working set of `inner` keys that shifts by one key per
//! outer step. Outlier keys start at the configured offset and increase by one
//! per emission, so they are guaranteed misses for any cache.
//!
//! The outlier counter belongs to the iterator, not to any global, so every
//! call to [`WorkloadGenerator::generate`] replays the identical sequence.

use crate::config::WorkloadConfig;
use crate::Key;
use core::iter::FusedIterator;
use tracing::debug;

/// Whether an emitted key belongs to the reused window or the outlier stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Key `i + j`, revisited by neighbouring outer steps.
    Local,
    /// Unique key, never emitted twice.
    Outlier,
}

/// A classified key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Access {
    /// The key to look up.
    pub key: Key,
    /// Where it came from.
    pub kind: AccessKind,
}

/// Entry point for building workload iterators.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkloadGenerator;

impl WorkloadGenerator {
    /// Returns a lazy iterator over the workload's keys.
    ///
    /// ```
    /// use missbench::{WorkloadConfig, WorkloadGenerator};
    ///
    /// let config = WorkloadConfig::new(2, 3, vec![2]).unwrap()
    ///     .with_outlier_offset(100).unwrap();
    /// let keys: Vec<u64> = WorkloadGenerator::generate(&config).collect();
    /// assert_eq!(keys, vec![1, 2, 100, 3, 2, 3, 101, 4]);
    /// ```
    pub fn generate(config: &WorkloadConfig) -> Workload<'_> {
        debug!(
            outer = config.outer(),
            inner = config.inner(),
            moduli = ?config.moduli(),
            total = config.total_accesses(),
            "generating workload"
        );
        Workload {
            inner: Accesses::new(config),
        }
    }

    /// Like [`generate`](Self::generate), but tags each key with its
    /// [`AccessKind`].
    pub fn generate_accesses(config: &WorkloadConfig) -> Accesses<'_> {
        Accesses::new(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// Next emission is the local key for the current `(i, j)`.
    Local,
    /// Next emission is decided by the modulus at this index.
    Modulus(usize),
}

/// Iterator over classified workload accesses.
#[derive(Debug, Clone)]
pub struct Accesses<'a> {
    config: &'a WorkloadConfig,
    i: u64,
    j: u64,
    cursor: Cursor,
    next_outlier: Key,
    remaining: u64,
}

impl<'a> Accesses<'a> {
    fn new(config: &'a WorkloadConfig) -> Self {
        Accesses {
            config,
            i: 0,
            j: 1,
            cursor: Cursor::Local,
            next_outlier: config.outlier_offset(),
            remaining: config.total_accesses(),
        }
    }

    /// Outlier key the iterator will hand out next.
    pub fn next_outlier(&self) -> Key {
        self.next_outlier
    }

    fn advance(&mut self) {
        self.cursor = Cursor::Local;
        if self.j == self.config.inner() {
            self.j = 1;
            self.i += 1;
        } else {
            self.j += 1;
        }
    }
}

impl Iterator for Accesses<'_> {
    type Item = Access;

    fn next(&mut self) -> Option<Access> {
        let moduli = self.config.moduli();
        while self.i < self.config.outer() {
            match self.cursor {
                Cursor::Local => {
                    self.cursor = Cursor::Modulus(0);
                    self.remaining -= 1;
                    return Some(Access {
                        key: self.i + self.j,
                        kind: AccessKind::Local,
                    });
                }
                Cursor::Modulus(idx) if idx < moduli.len() => {
                    self.cursor = Cursor::Modulus(idx + 1);
                    if self.j % moduli[idx] == 0 {
                        let key = self.next_outlier;
                        self.next_outlier += 1;
                        self.remaining -= 1;
                        return Some(Access {
                            key,
                            kind: AccessKind::Outlier,
                        });
                    }
                }
                Cursor::Modulus(_) => self.advance(),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Accesses<'_> {}

/// Iterator over workload keys, returned by [`WorkloadGenerator::generate`].
///
/// Finite, and restartable by calling `generate` again. Cloning yields an
/// independent cursor at the same position.
#[derive(Debug, Clone)]
pub struct Workload<'a> {
    inner: Accesses<'a>,
}

impl Iterator for Workload<'_> {
    type Item = Key;

    #[inline]
    fn next(&mut self) -> Option<Key> {
        self.inner.next().map(|access| access.key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl FusedIterator for Workload<'_> {}
