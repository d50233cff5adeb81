//! Engine configuration shared by the processing strategies

use std::time::Duration;

use tracing::warn;

use crate::core::RunOptions;

/// Configuration for a consolidation run
///
/// Controls the size of the runtime's worker pool, the simulated per-account
/// backend delay, and the optional run deadline.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Number of async worker threads in the run's runtime
    pub worker_threads: usize,
    /// Blocking delay applied to each account (simulated slow backend)
    pub item_delay: Duration,
    /// Deadline for the whole run, if any
    pub timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            item_delay: Duration::ZERO,
            timeout: None,
        }
    }
}

impl EngineConfig {
    /// Create a new EngineConfig with custom values
    ///
    /// Zero worker threads falls back to the default with a warning. A zero
    /// timeout is kept: it expires immediately.
    pub fn new(worker_threads: usize, item_delay: Duration, timeout: Option<Duration>) -> Self {
        let default = Self::default();

        let worker_threads = if worker_threads == 0 {
            warn!(
                "Invalid worker_threads ({}), using default ({})",
                worker_threads, default.worker_threads
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            worker_threads,
            item_delay,
            timeout,
        }
    }

    /// Per-run options derived from this configuration
    pub fn run_options(&self) -> RunOptions {
        match self.timeout {
            Some(timeout) => RunOptions::new().with_timeout(timeout),
            None => RunOptions::new(),
        }
    }
}
