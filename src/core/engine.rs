//! Batch consolidation engine
//!
//! This module provides the `ConsolidationEngine`, which consolidates a batch
//! of accounts concurrently and resolves with a frozen `BatchRun`.
//!
//! # Design
//!
//! ```text
//! run(accounts)
//!     ├── materialize input once (Arc<[AccountRecord]>)
//!     ├── fan out: one spawn_blocking unit per account
//!     ├── fan in:  FuturesUnordered, result i -> slot i
//!     └── resolve: BatchRun | AggregateFailure | Cancelled | TimedOut
//! ```
//!
//! Work units run on tokio's blocking pool, so the runtime decides how many
//! OS threads are busy at once; there is no fixed partitioning. The fan-in
//! loop is driven by task completion, never by polling with a sleep.
//!
//! # Thread Safety
//!
//! Units share only the read-only input. Each unit hands its result back
//! tagged with its index and the fan-in task writes it into a pre-sized slot,
//! so no two writers ever touch the same location and no lock is needed.
//!
//! # Failure, cancellation and timeout
//!
//! All three stop the run cooperatively: units that have not started yet
//! skip the consolidation call, units already running are allowed to
//! finish, and the run resolves only after every unit has settled. The first
//! cause observed decides the outcome. Results are all-or-nothing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::traits::{Consolidate, ProgressReporter};
use crate::types::{
    AccountRecord, BatchRun, ConsolidationError, ConsolidationResult, ItemFailure, RunOutcome,
};

/// Per-run options
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Raised by the caller to stop the run cooperatively
    pub cancel: CancellationToken,
    /// Upper bound for the whole run, measured from the trigger
    pub timeout: Option<Duration>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Outcome of a single work unit
#[derive(Debug)]
enum UnitOutcome {
    Done(ConsolidationResult),
    Failed(ConsolidationError),
    /// The run was stopping before the unit started
    Skipped,
}

/// Why the run stopped starting new units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    ItemFailed,
    Cancelled,
    TimedOut,
}

/// Handle to an in-flight run
///
/// Resolves exactly once with the run's outcome; awaiting consumes it.
/// Dropping the handle does not stop the run.
#[derive(Debug)]
pub struct RunHandle {
    task: JoinHandle<RunOutcome>,
    runtime: Handle,
}

impl RunHandle {
    /// The runtime the run executes on
    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }
}

impl Future for RunHandle {
    type Output = RunOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.task).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(e)) => Poll::Ready(Err(ConsolidationError::runtime(format!(
                "consolidation run task failed: {}",
                e
            )))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Concurrent batch consolidation engine
///
/// Cheap to clone; clones share the consolidation function and runtime.
pub struct ConsolidationEngine<C> {
    /// The consolidation function, shared by every work unit
    consolidator: Arc<C>,

    /// Runtime the fan-in task and work units are spawned on
    runtime: Handle,

    /// Receives per-item completion events
    reporter: Option<Arc<dyn ProgressReporter>>,
}

impl<C> Clone for ConsolidationEngine<C> {
    fn clone(&self) -> Self {
        Self {
            consolidator: Arc::clone(&self.consolidator),
            runtime: self.runtime.clone(),
            reporter: self.reporter.clone(),
        }
    }
}

impl<C: Consolidate> ConsolidationEngine<C> {
    /// Create a new engine
    ///
    /// # Arguments
    ///
    /// * `consolidator` - Consolidation function invoked once per account
    /// * `runtime` - Handle of a multi-threaded tokio runtime
    pub fn new(consolidator: Arc<C>, runtime: Handle) -> Self {
        Self {
            consolidator,
            runtime,
            reporter: None,
        }
    }

    /// Attach a reporter notified as each unit settles
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Start consolidating `accounts`
    ///
    /// The input is materialized before anything else happens, so a lazy
    /// iterator is evaluated exactly once. Returns immediately; the run
    /// proceeds on the engine's runtime.
    pub fn run<I>(&self, accounts: I, options: RunOptions) -> RunHandle
    where
        I: IntoIterator<Item = AccountRecord>,
    {
        let accounts: Arc<[AccountRecord]> = accounts.into_iter().collect();
        let started_at = Instant::now();

        let task = self.runtime.spawn(execute_run(
            Arc::clone(&self.consolidator),
            accounts,
            options,
            started_at,
            self.reporter.clone(),
        ));

        RunHandle {
            task,
            runtime: self.runtime.clone(),
        }
    }
}

/// Fan out one unit per account, fan in, and package the outcome
async fn execute_run<C: Consolidate>(
    consolidator: Arc<C>,
    accounts: Arc<[AccountRecord]>,
    options: RunOptions,
    started_at: Instant,
    reporter: Option<Arc<dyn ProgressReporter>>,
) -> RunOutcome {
    let total = accounts.len();
    let RunOptions { cancel, timeout } = options;

    if cancel.is_cancelled() {
        debug!(total, "run cancelled before fan-out");
        return Err(ConsolidationError::Cancelled {
            completed: 0,
            total,
        });
    }

    if total == 0 {
        return Ok(BatchRun::complete(accounts, Vec::new(), started_at));
    }

    info!(total, "consolidation run started");

    // Cancelled by the caller's token, by the first failure, or by the deadline.
    let stop = cancel.child_token();

    let mut pending: FuturesUnordered<_> = (0..total)
        .map(|index| {
            let unit = spawn_unit(
                Arc::clone(&consolidator),
                Arc::clone(&accounts),
                index,
                stop.clone(),
            );
            async move { (index, unit.await) }
        })
        .collect();

    let deadline = async {
        match timeout {
            Some(timeout) => {
                let elapsed = started_at.elapsed();
                tokio::time::sleep(timeout.saturating_sub(elapsed)).await
            }
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let mut slots: Vec<Option<ConsolidationResult>> = vec![None; total];
    let mut failures: Vec<ItemFailure> = Vec::new();
    let mut completed = 0usize;
    let mut stop_reason: Option<StopReason> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled(), if stop_reason.is_none() => {
                debug!(completed, total, "cancellation requested");
                stop_reason = Some(StopReason::Cancelled);
                stop.cancel();
            }
            _ = &mut deadline, if stop_reason.is_none() => {
                warn!(completed, total, "consolidation run hit its timeout");
                stop_reason = Some(StopReason::TimedOut);
                stop.cancel();
            }
            settled = pending.next() => {
                let Some((index, joined)) = settled else {
                    break;
                };

                let failure = match joined {
                    Ok(UnitOutcome::Done(result)) => {
                        slots[index] = Some(result);
                        completed += 1;
                        None
                    }
                    Ok(UnitOutcome::Failed(error)) => Some(error),
                    Ok(UnitOutcome::Skipped) => continue,
                    Err(e) => Some(ConsolidationError::runtime(format!(
                        "consolidation task aborted: {}",
                        e
                    ))),
                };

                if let Some(error) = failure {
                    let failure = ItemFailure {
                        index,
                        account: accounts[index].id,
                        error,
                    };
                    warn!(%failure, "account consolidation failed");
                    failures.push(failure);

                    if stop_reason.is_none() {
                        stop_reason = Some(StopReason::ItemFailed);
                        stop.cancel();
                    }
                }

                if let Some(reporter) = &reporter {
                    reporter.on_item_completed(index);
                }
            }
        }
    }

    match stop_reason {
        Some(StopReason::Cancelled) => Err(ConsolidationError::Cancelled { completed, total }),
        Some(StopReason::TimedOut) => Err(ConsolidationError::TimedOut {
            timeout: timeout.unwrap_or_default(),
            completed,
            total,
        }),
        _ if !failures.is_empty() => {
            failures.sort_by_key(|failure| failure.index);
            Err(ConsolidationError::AggregateFailure {
                failures,
                succeeded: completed,
                total,
            })
        }
        _ => {
            let results: Option<Vec<ConsolidationResult>> = slots.into_iter().collect();
            let results = results.ok_or_else(|| {
                ConsolidationError::runtime("a result slot was left empty after fan-in")
            })?;
            let run = BatchRun::complete(accounts, results, started_at);
            info!(
                total,
                elapsed_ms = run.elapsed().as_millis() as u64,
                "consolidation run completed"
            );
            Ok(run)
        }
    }
}

/// Spawn the work unit for the account at `index` on the blocking pool
fn spawn_unit<C: Consolidate>(
    consolidator: Arc<C>,
    accounts: Arc<[AccountRecord]>,
    index: usize,
    stop: CancellationToken,
) -> JoinHandle<UnitOutcome> {
    tokio::task::spawn_blocking(move || {
        if stop.is_cancelled() {
            return UnitOutcome::Skipped;
        }

        match consolidator.consolidate(&accounts[index]) {
            Ok(result) => UnitOutcome::Done(result),
            Err(e) => UnitOutcome::Failed(e),
        }
    })
}
