//! Scenario runner for eviction policies
//!
//! For every modulus in the scenario the runner computes the estimator's lower
//! bound, then drives each selected policy through a fresh cache over the same
//! workload. Deterministic policies produce the same miss count on every pass,
//! so they run once; randomized policies run `repetitions` times with
//! per-trial seeds and report the floored mean.
//!
//! Each trial owns its cache, policy and loader. With `parallel` enabled the
//! repetitions of one policy are spread over at most one scoped thread per
//! available core and their miss counts are collected under a mutex; ordering of the collected results does not affect
//! the mean.

use std::num::NonZeroUsize;
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, Context};
use missbench::config::CacheConfig;
use missbench::{unit_loader, BoundedCache, OptimalEstimator, WorkloadConfig, WorkloadGenerator};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::models::{ModulusResult, PolicyKind, ScenarioConfig};

/// Outcome of a single trial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    /// Loader invocations
    pub misses: u64,
    /// Requests served
    pub requests: u64,
    /// Largest resident count observed
    pub peak_len: usize,
}

/// Run one policy over one workload with a fresh cache
pub fn run_trial(
    policy: PolicyKind,
    capacity: NonZeroUsize,
    workload: &WorkloadConfig,
    seed: u64,
) -> missbench::Result<TrialOutcome> {
    let mut cache = BoundedCache::init(
        CacheConfig { capacity },
        policy.build(capacity, seed),
        unit_loader::<u64>(),
    );
    let requests = cache.replay(WorkloadGenerator::generate(workload))?;
    Ok(TrialOutcome {
        misses: cache.loader().misses(),
        requests,
        peak_len: cache.stats().peak_len,
    })
}

/// Threads used for `repetitions` parallel trials, capped by the host
fn worker_count(repetitions: usize) -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(repetitions)
        .max(1)
}

/// Drives a whole scenario
#[derive(Debug)]
pub struct ScenarioRunner {
    config: ScenarioConfig,
    capacity: NonZeroUsize,
}

impl ScenarioRunner {
    /// Create a runner, validating the scenario up front
    pub fn new(config: ScenarioConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.capacity)
            .ok_or_else(|| anyhow!("capacity must be greater than zero"))?;
        Ok(Self { config, capacity })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Run every modulus in order
    pub fn run(&self) -> anyhow::Result<Vec<ModulusResult>> {
        let start = Instant::now();
        let results = self
            .config
            .moduli
            .iter()
            .map(|&modulus| self.run_modulus(modulus))
            .collect::<anyhow::Result<Vec<_>>>()?;
        info!(
            moduli = results.len(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "scenario complete"
        );
        Ok(results)
    }

    /// Run every selected policy against the workload for `modulus`
    pub fn run_modulus(&self, modulus: u64) -> anyhow::Result<ModulusResult> {
        let workload = self.config.workload_for(modulus)?;
        let best_possible = OptimalEstimator::lower_bound(&workload);

        let mut misses = Vec::with_capacity(self.config.policies.len());
        for &policy in &self.config.policies {
            let average = self.average_misses(policy, &workload, modulus)?;
            misses.push((policy, average));
        }

        info!(modulus, best_possible, ?misses, "modulus complete");
        Ok(ModulusResult {
            modulus,
            best_possible,
            misses,
        })
    }

    fn average_misses(
        &self,
        policy: PolicyKind,
        workload: &WorkloadConfig,
        modulus: u64,
    ) -> anyhow::Result<u64> {
        let repetitions = if policy.is_randomized() {
            self.config.repetitions
        } else {
            1
        };

        let counts = if self.config.parallel && repetitions > 1 {
            self.trials_parallel(policy, workload, modulus, repetitions)?
        } else {
            (0..repetitions)
                .map(|trial| self.trial(policy, workload, modulus, trial))
                .collect::<anyhow::Result<Vec<_>>>()?
        };

        let total: u64 = counts.iter().sum();
        Ok(total / counts.len() as u64)
    }

    fn trials_parallel(
        &self,
        policy: PolicyKind,
        workload: &WorkloadConfig,
        modulus: u64,
        repetitions: usize,
    ) -> anyhow::Result<Vec<u64>> {
        let workers = worker_count(repetitions);
        let counts = Mutex::new(Vec::with_capacity(repetitions));
        debug!(%policy, modulus, repetitions, workers, "running trials in parallel");

        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let counts = &counts;
                    scope.spawn(move || -> anyhow::Result<()> {
                        // worker `w` takes trials w, w + workers, ...
                        for trial in (worker..repetitions).step_by(workers) {
                            let misses = self.trial(policy, workload, modulus, trial)?;
                            counts.lock().push(misses);
                        }
                        Ok(())
                    })
                })
                .collect();

            handles.into_iter().try_for_each(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow!("trial thread for {policy} at modulus {modulus} panicked"))?
            })
        })?;

        Ok(counts.into_inner())
    }

    fn trial(
        &self,
        policy: PolicyKind,
        workload: &WorkloadConfig,
        modulus: u64,
        trial: usize,
    ) -> anyhow::Result<u64> {
        let seed = self.config.seed.wrapping_add(trial as u64);
        let outcome = run_trial(policy, self.capacity, workload, seed).with_context(|| {
            format!("trial {trial} of {policy} at modulus {modulus}")
        })?;
        debug!(
            %policy,
            modulus,
            trial,
            misses = outcome.misses,
            peak_len = outcome.peak_len,
            "trial complete"
        );
        Ok(outcome.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_scenario() -> ScenarioConfig {
        ScenarioConfig {
            capacity: 40,
            outer: 200,
            inner: 30,
            moduli: vec![31, 7, 1],
            repetitions: 4,
            ..ScenarioConfig::default()
        }
    }

    #[test]
    fn test_run_trial_counts_requests() {
        let workload = WorkloadConfig::new(50, 10, vec![5]).unwrap();
        let capacity = NonZeroUsize::new(8).unwrap();
        let outcome = run_trial(PolicyKind::Lru, capacity, &workload, 0).unwrap();
        assert_eq!(outcome.requests, workload.total_accesses());
        assert!(outcome.peak_len <= 8);
        assert!(outcome.misses >= OptimalEstimator::lower_bound(&workload));
    }

    #[test]
    fn test_rows_follow_moduli_order() {
        let runner = ScenarioRunner::new(small_scenario()).unwrap();
        let results = runner.run().unwrap();
        let moduli: Vec<_> = results.iter().map(|r| r.modulus).collect();
        assert_eq!(moduli, vec![31, 7, 1]);

        for result in &results {
            assert_eq!(result.misses.len(), PolicyKind::all().len());
            for &(policy, misses) in &result.misses {
                assert!(
                    misses >= result.best_possible,
                    "{policy} below bound at modulus {}",
                    result.modulus
                );
            }
        }
        // no outliers and the window fits
        assert_eq!(results[0].misses_for(PolicyKind::Lru), Some(229));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = ScenarioRunner::new(small_scenario()).unwrap().run().unwrap();
        let parallel = ScenarioRunner::new(ScenarioConfig {
            parallel: true,
            ..small_scenario()
        })
        .unwrap()
        .run()
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_random_average_uses_all_repetitions() {
        let config = ScenarioConfig {
            policies: vec![PolicyKind::Random],
            moduli: vec![3],
            ..small_scenario()
        };
        let runner = ScenarioRunner::new(config.clone()).unwrap();
        let result = runner.run_modulus(3).unwrap();

        let workload = config.workload_for(3).unwrap();
        let capacity = NonZeroUsize::new(config.capacity).unwrap();
        let total: u64 = (0..config.repetitions)
            .map(|trial| {
                run_trial(PolicyKind::Random, capacity, &workload, config.seed + trial as u64)
                    .unwrap()
                    .misses
            })
            .sum();
        assert_eq!(
            result.misses_for(PolicyKind::Random),
            Some(total / config.repetitions as u64)
        );
    }

    #[test]
    fn test_worker_count_is_bounded() {
        let host = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        assert_eq!(worker_count(1), 1);
        assert_eq!(worker_count(10_000), host);
        assert!(worker_count(3) <= 3);
    }

    #[test]
    fn test_parallel_with_more_repetitions_than_workers() {
        let config = ScenarioConfig {
            policies: vec![PolicyKind::Random],
            moduli: vec![7],
            repetitions: 3 * worker_count(usize::MAX) + 1,
            ..small_scenario()
        };
        let sequential = ScenarioRunner::new(config.clone()).unwrap().run().unwrap();
        let parallel = ScenarioRunner::new(ScenarioConfig {
            parallel: true,
            ..config
        })
        .unwrap()
        .run()
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_huge_capacity_runs_every_policy() {
        let workload = WorkloadConfig::new(20, 10, vec![3]).unwrap();
        let capacity = NonZeroUsize::new(usize::MAX).unwrap();
        for policy in PolicyKind::all() {
            let outcome = run_trial(policy, capacity, &workload, 0).unwrap();
            // nothing is ever evicted, so only first sightings miss
            assert_eq!(
                outcome.misses,
                OptimalEstimator::lower_bound(&workload),
                "{policy}"
            );
        }
    }

    #[test]
    fn test_invalid_scenario_rejected() {
        let config = ScenarioConfig {
            repetitions: 0,
            ..small_scenario()
        };
        assert!(ScenarioRunner::new(config).is_err());
    }
}
