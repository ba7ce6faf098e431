// Data models for benchmark scenarios

use anyhow::{bail, Context};
use missbench::config::{
    SlruConfig, DEFAULT_CAPACITY, DEFAULT_INNER, DEFAULT_MODULI, DEFAULT_OUTER,
};
use missbench::policy::random::DEFAULT_SEED;
use missbench::{
    EvictionPolicy, FifoPolicy, LfuPolicy, LruPolicy, RandomPolicy, SlruPolicy, WorkloadConfig,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::str::FromStr;

/// Eviction policies the runner can benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Lru,
    Lfu,
    Slru,
    Fifo,
    Random,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Lru => "LRU",
            PolicyKind::Lfu => "LFU",
            PolicyKind::Slru => "SLRU",
            PolicyKind::Fifo => "FIFO",
            PolicyKind::Random => "Random",
        }
    }

    /// Get all available policies, in report column order
    pub fn all() -> Vec<PolicyKind> {
        vec![
            PolicyKind::Lru,
            PolicyKind::Lfu,
            PolicyKind::Slru,
            PolicyKind::Fifo,
            PolicyKind::Random,
        ]
    }

    /// Whether repeated trials can produce different miss counts
    pub fn is_randomized(&self) -> bool {
        matches!(self, PolicyKind::Random)
    }

    /// Build a fresh policy instance for one trial
    pub fn build(&self, capacity: NonZeroUsize, seed: u64) -> Box<dyn EvictionPolicy<u64>> {
        match self {
            PolicyKind::Lru => Box::new(LruPolicy::with_capacity(capacity.get())),
            PolicyKind::Lfu => Box::new(LfuPolicy::new()),
            PolicyKind::Slru => Box::new(SlruPolicy::init(SlruConfig::for_capacity(capacity))),
            PolicyKind::Fifo => Box::new(FifoPolicy::new()),
            PolicyKind::Random => Box::new(RandomPolicy::with_seed(seed)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lru" => Ok(PolicyKind::Lru),
            "lfu" => Ok(PolicyKind::Lfu),
            "slru" => Ok(PolicyKind::Slru),
            "fifo" => Ok(PolicyKind::Fifo),
            "random" | "rand" => Ok(PolicyKind::Random),
            other => Err(format!(
                "unknown policy '{other}' (expected lru, lfu, slru, fifo or random)"
            )),
        }
    }
}

/// Scenario parameters, loadable from a TOML file
///
/// ```toml
/// capacity = 150
/// moduli = [101, 7, 1]
/// policies = ["lru", "random"]
/// repetitions = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Cache capacity in number of entries
    pub capacity: usize,
    /// Outer iteration count of the workload
    pub outer: u64,
    /// Inner range width of the workload
    pub inner: u64,
    /// Moduli to sweep; each one is a separate report row
    pub moduli: Vec<u64>,
    /// Policies to benchmark
    pub policies: Vec<PolicyKind>,
    /// Trials averaged per randomized policy
    pub repetitions: usize,
    /// Base seed; trial `n` uses `seed + n`
    pub seed: u64,
    /// Run repetitions on scoped threads
    pub parallel: bool,
    /// First outlier key (None = derived from the workload shape)
    pub outlier_offset: Option<u64>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            outer: DEFAULT_OUTER,
            inner: DEFAULT_INNER,
            moduli: DEFAULT_MODULI.to_vec(),
            policies: PolicyKind::all(),
            repetitions: 10,
            seed: DEFAULT_SEED,
            parallel: false,
            outlier_offset: None,
        }
    }
}

impl ScenarioConfig {
    /// Parse a scenario from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("failed to parse scenario TOML")
    }

    /// Read and parse a scenario file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file '{}'", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid scenario file '{}'", path.display()))
    }

    /// Reject scenarios that cannot produce a report
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.capacity == 0 {
            bail!("capacity must be greater than zero");
        }
        if self.moduli.is_empty() {
            bail!("at least one modulus is required");
        }
        if self.policies.is_empty() {
            bail!("at least one policy is required");
        }
        if self.repetitions == 0 {
            bail!("repetitions must be greater than zero");
        }
        for &modulus in &self.moduli {
            self.workload_for(modulus)?;
        }
        Ok(())
    }

    /// Workload for a single report row
    pub fn workload_for(&self, modulus: u64) -> anyhow::Result<WorkloadConfig> {
        let config = WorkloadConfig::new(self.outer, self.inner, vec![modulus])
            .with_context(|| format!("invalid workload for modulus {modulus}"))?;
        match self.outlier_offset {
            Some(offset) => config
                .with_outlier_offset(offset)
                .with_context(|| format!("invalid outlier offset {offset}")),
            None => Ok(config),
        }
    }
}

/// Miss counts for one modulus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulusResult {
    pub modulus: u64,
    /// Lower bound from the estimator
    pub best_possible: u64,
    /// Average misses per policy, in the scenario's policy order
    pub misses: Vec<(PolicyKind, u64)>,
}

impl ModulusResult {
    pub fn misses_for(&self, policy: PolicyKind) -> Option<u64> {
        self.misses
            .iter()
            .find(|(kind, _)| *kind == policy)
            .map(|(_, misses)| *misses)
    }
}

/// CSV export row; columns for policies that were not run stay empty
#[derive(Debug, Serialize)]
pub struct CsvResultRow {
    pub modulus: u64,
    pub best_possible: u64,
    pub lru: Option<u64>,
    pub lfu: Option<u64>,
    pub slru: Option<u64>,
    pub fifo: Option<u64>,
    pub random: Option<u64>,
}

impl From<&ModulusResult> for CsvResultRow {
    fn from(result: &ModulusResult) -> Self {
        Self {
            modulus: result.modulus,
            best_possible: result.best_possible,
            lru: result.misses_for(PolicyKind::Lru),
            lfu: result.misses_for(PolicyKind::Lfu),
            slru: result.misses_for(PolicyKind::Slru),
            fifo: result.misses_for(PolicyKind::Fifo),
            random: result.misses_for(PolicyKind::Random),
        }
    }
}
