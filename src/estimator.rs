//! Lower bound on misses for a workload.
//!
//! Every distinct local key must be loaded at least once, and every outlier is
//! a key nobody has seen before, so no cache of any capacity can do better than
//!
//! ```text
//! (outer + inner - 1) + outer * Σ_m floor(inner / m)
//! ```
//!
//! This is a closed form over the workload's structure, not a simulation of
//! Bélády's algorithm at a concrete capacity. It is therefore a floor for every
//! policy and every capacity at once.

use crate::config::WorkloadConfig;

/// The two components of the miss floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LowerBound {
    /// Compulsory misses on distinct local keys.
    pub baseline: u64,
    /// Misses forced by outlier keys, one per emission.
    pub forced_outlier_misses: u64,
}

impl LowerBound {
    /// Sum of both components.
    #[inline]
    pub fn total(&self) -> u64 {
        self.baseline + self.forced_outlier_misses
    }
}

/// Computes miss floors without running a cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalEstimator;

impl OptimalEstimator {
    /// Minimum number of misses any cache incurs on `config`'s workload.
    ///
    /// ```
    /// use missbench::{OptimalEstimator, WorkloadConfig};
    ///
    /// let never = WorkloadConfig::new(10_000, 100, vec![101]).unwrap();
    /// assert_eq!(OptimalEstimator::lower_bound(&never), 10_099);
    ///
    /// let always = WorkloadConfig::new(10_000, 100, vec![1]).unwrap();
    /// assert_eq!(OptimalEstimator::lower_bound(&always), 1_010_099);
    /// ```
    pub fn lower_bound(config: &WorkloadConfig) -> u64 {
        Self::estimate(config).total()
    }

    /// Breaks the lower bound into its baseline and outlier components.
    pub fn estimate(config: &WorkloadConfig) -> LowerBound {
        // each outer step sees the same j range, so count one step and scale
        let per_outer: u64 = config
            .moduli()
            .iter()
            .map(|&m| config.inner() / m)
            .sum();
        LowerBound {
            baseline: config.distinct_local_keys(),
            forced_outlier_misses: per_outer * config.outer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MODULI;

    #[test]
    fn test_no_outliers_is_baseline_only() {
        let config = WorkloadConfig::new(10_000, 100, vec![101]).unwrap();
        let bound = OptimalEstimator::estimate(&config);
        assert_eq!(bound.baseline, 10_099);
        assert_eq!(bound.forced_outlier_misses, 0);
        assert_eq!(bound.total(), 10_099);
    }

    #[test]
    fn test_every_step_outlier() {
        let config = WorkloadConfig::new(10_000, 100, vec![1]).unwrap();
        assert_eq!(OptimalEstimator::lower_bound(&config), 1_010_099);
    }

    #[test]
    fn test_multiple_moduli_accumulate() {
        let config = WorkloadConfig::new(4, 12, vec![2, 3, 13]).unwrap();
        let bound = OptimalEstimator::estimate(&config);
        assert_eq!(bound.baseline, 15);
        // 6 + 4 + 0 per outer step
        assert_eq!(bound.forced_outlier_misses, 40);
    }

    #[test]
    fn test_matches_workload_outlier_count() {
        for &m in DEFAULT_MODULI.iter() {
            let config = WorkloadConfig::new(300, 100, vec![m]).unwrap();
            let bound = OptimalEstimator::estimate(&config);
            assert_eq!(bound.forced_outlier_misses, config.outlier_count());
            assert_eq!(bound.baseline, 399);
        }
    }

    #[test]
    fn test_monotonic_in_moduli() {
        let small = WorkloadConfig::new(100, 50, vec![7]).unwrap();
        let large = WorkloadConfig::new(100, 50, vec![7, 3]).unwrap();
        assert!(OptimalEstimator::lower_bound(&large) > OptimalEstimator::lower_bound(&small));
    }
}
