use std::io;
use std::path::PathBuf;

use anyhow::Context;
use bench_runner::models::{PolicyKind, ScenarioConfig};
use bench_runner::report;
use bench_runner::runner::ScenarioRunner;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Eviction policy miss benchmark
///
/// Sweeps the outlier moduli and prints, per modulus, the lower bound on
/// misses followed by each policy's observed misses.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML scenario file; flags below override its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Cache capacity (number of entries) [default: 150]
    #[arg(short, long)]
    capacity: Option<usize>,

    /// Outer iteration count [default: 10000]
    #[arg(long)]
    outer: Option<u64>,

    /// Inner range width [default: 100]
    #[arg(long)]
    inner: Option<u64>,

    /// Moduli to sweep, one report row each
    /// [default: 101,55,49,31,23,17,11,9,8,7,6,5,4,3,2,1]
    #[arg(short, long, value_name = "LIST", num_args = 1.., value_delimiter = ',')]
    moduli: Option<Vec<u64>>,

    /// Policies to benchmark (lru, lfu, slru, fifo, random)
    /// If not provided, all policies will be used
    #[arg(short, long, value_name = "LIST", num_args = 1.., value_delimiter = ',')]
    policies: Option<Vec<PolicyKind>>,

    /// Trials averaged for randomized policies [default: 10]
    #[arg(short, long)]
    repetitions: Option<usize>,

    /// Base seed for randomized policies
    #[arg(long)]
    seed: Option<u64>,

    /// Run repetitions on worker threads
    #[arg(long)]
    parallel: bool,

    /// Write CSV to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    output_csv: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Resolve the scenario: file (or defaults), then flag overrides
    fn scenario(&self) -> anyhow::Result<ScenarioConfig> {
        let mut config = match &self.config {
            Some(path) => ScenarioConfig::load(path)?,
            None => ScenarioConfig::default(),
        };

        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(outer) = self.outer {
            config.outer = outer;
        }
        if let Some(inner) = self.inner {
            config.inner = inner;
        }
        if let Some(moduli) = &self.moduli {
            config.moduli = moduli.clone();
        }
        if let Some(policies) = &self.policies {
            config.policies = policies.clone();
        }
        if let Some(repetitions) = self.repetitions {
            config.repetitions = repetitions;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.parallel {
            config.parallel = true;
        }
        Ok(config)
    }
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{level}'"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let config = args.scenario()?;
    info!(
        capacity = config.capacity,
        outer = config.outer,
        inner = config.inner,
        policies = ?config.policies,
        repetitions = config.repetitions,
        parallel = config.parallel,
        "starting benchmark"
    );

    let runner = ScenarioRunner::new(config).context("invalid scenario")?;
    let results = runner.run()?;

    match &args.output_csv {
        Some(path) => {
            report::export_csv(path, &results)?;
            info!(path = %path.display(), "results exported");
        }
        None => report::write_csv(io::stdout().lock(), &results)?,
    }
    Ok(())
}
