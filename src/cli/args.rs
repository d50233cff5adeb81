use crate::strategy::EngineConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Consolidate account movements concurrently
#[derive(Parser, Debug)]
#[command(name = "account-consolidator")]
#[command(about = "Consolidate account movements concurrently", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing account movements
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Completion style used to hand the run's outcome back to the owner
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "await",
        help = "Completion style: 'continuation' for a registered callback or 'await' for an awaited task"
    )]
    pub strategy: StrategyType,

    /// Worker threads for the consolidation runtime
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    /// Simulated backend latency per account
    #[arg(
        long = "delay-ms",
        value_name = "MILLIS",
        help = "Blocking delay applied to each account, in milliseconds (default: 0)"
    )]
    pub delay_ms: Option<u64>,

    /// Deadline for the whole run
    #[arg(
        long = "timeout-ms",
        value_name = "MILLIS",
        help = "Fail the run if it takes longer than this, in milliseconds (default: none)"
    )]
    pub timeout_ms: Option<u64>,
}

/// Available completion styles
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Continuation,
    Await,
}

impl CliArgs {
    /// Create an EngineConfig from CLI arguments
    ///
    /// Values not given on the command line fall back to the defaults. A zero
    /// worker-thread count is replaced by the default with a warning.
    pub fn to_engine_config(&self) -> EngineConfig {
        let default = EngineConfig::default();
        EngineConfig::new(
            self.worker_threads.unwrap_or(default.worker_threads),
            self.delay_ms.map(Duration::from_millis).unwrap_or(default.item_delay),
            self.timeout_ms.map(Duration::from_millis).or(default.timeout),
        )
    }
}
