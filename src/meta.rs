//! Policy-Specific Metadata Types
//!
//! Per-key bookkeeping kept by eviction policies. The cache itself stores only
//! `(key, value)`; each policy keeps whatever it needs to rank keys.
//!
//! | Policy  | Metadata Type | Description |
//! |---------|---------------|-------------|
//! | LRU     | list handle | Position in recency list |
//! | FIFO    | list handle | Position in insertion list |
//! | LFU     | [`LfuMeta`]   | Access count and logical time of last access |
//! | SLRU    | [`SlruMeta`]  | Segment plus position within it |
//! | Random  | `usize`       | Index into the dense key array |
//!
//! ```
//! use missbench::meta::{LfuMeta, SlruMeta, SlruSegment};
//!
//! let mut meta = LfuMeta::new(7);
//! assert_eq!(meta.frequency, 1);
//! meta.touch(9);
//! assert_eq!((meta.frequency, meta.last_access), (2, 9));
//!
//! let slru = SlruMeta::new(SlruSegment::Probationary, 0);
//! assert_eq!(slru.segment, SlruSegment::Probationary);
//! ```

use crate::list::Handle;

/// Metadata for LFU entries.
///
/// Keys are ranked by `(frequency, last_access)`: lowest frequency first, and
/// among equals the one touched longest ago. `last_access` comes from a
/// policy-wide logical clock, so it is unique per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfuMeta {
    /// Number of accesses since the key was admitted.
    pub frequency: u64,
    /// Logical time of the most recent access.
    pub last_access: u64,
}

impl LfuMeta {
    /// Metadata for a key admitted at logical time `now`.
    #[inline]
    pub fn new(now: u64) -> Self {
        Self {
            frequency: 1,
            last_access: now,
        }
    }

    /// Records another access at logical time `now`.
    #[inline]
    pub fn touch(&mut self, now: u64) {
        self.frequency += 1;
        self.last_access = now;
    }

    /// Ordering key used by the LFU victim index.
    #[inline]
    pub fn rank(&self) -> (u64, u64) {
        (self.frequency, self.last_access)
    }
}

/// Segment location within an SLRU policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlruSegment {
    /// Admitted once; first in line for eviction.
    Probationary,
    /// Hit at least once while resident.
    Protected,
}

/// Metadata for SLRU entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlruMeta {
    /// Which segment currently holds the key.
    pub segment: SlruSegment,
    /// Position in that segment's list.
    pub handle: Handle,
}

impl SlruMeta {
    /// Creates SLRU metadata.
    #[inline]
    pub fn new(segment: SlruSegment, handle: Handle) -> Self {
        Self { segment, handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfu_rank_orders_by_frequency_then_age() {
        let mut a = LfuMeta::new(1);
        let b = LfuMeta::new(2);
        assert!(a.rank() < b.rank());
        a.touch(3);
        assert!(b.rank() < a.rank());
    }
}
