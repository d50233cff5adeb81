//! Consolidation controller
//!
//! Owner-side orchestration of one user-initiated run: guard against a
//! second trigger while a run is in flight, reset the view, start the
//! engine, and present the outcome back on the owner context.
//!
//! Two completion styles are offered:
//!
//! - [`ConsolidationController::trigger`] registers a continuation through
//!   the completion notifier and returns immediately.
//! - [`ConsolidationController::trigger_and_wait`] is an async flow meant to
//!   be spawned on the owner context; it awaits the run and then updates
//!   the view from that same context.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::engine::{ConsolidationEngine, RunOptions};
use super::notifier::notify_on_owner;
use super::owner::OwnerHandle;
use super::traits::{Consolidate, ConsolidationView, ProgressReporter};
use crate::types::{AccountRecord, ConsolidationError, RunOutcome};

/// Drives runs on behalf of an owner context
pub struct ConsolidationController<C> {
    engine: ConsolidationEngine<C>,
    reporter: Arc<dyn ProgressReporter>,
}

impl<C> Clone for ConsolidationController<C> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            reporter: Arc::clone(&self.reporter),
        }
    }
}

impl<C: Consolidate> ConsolidationController<C> {
    /// Create a controller; `reporter` also receives the engine's per-item events
    pub fn new(engine: ConsolidationEngine<C>, reporter: Arc<dyn ProgressReporter>) -> Self {
        Self {
            engine: engine.with_reporter(Arc::clone(&reporter)),
            reporter,
        }
    }

    /// Start a run from the owner context (continuation style)
    ///
    /// Must be called on the owner context, with `view` being that context's
    /// state, typically from inside an [`OwnerHandle::post`] closure. The
    /// outcome is presented through `owner` once the run resolves.
    ///
    /// # Errors
    ///
    /// `ConsolidationError::RunInProgress` if the view is still busy with a
    /// previous run. Nothing is started in that case.
    pub fn trigger<V>(
        &self,
        view: &mut V,
        owner: &OwnerHandle<V>,
        accounts: Vec<AccountRecord>,
        options: RunOptions,
    ) -> Result<(), ConsolidationError>
    where
        V: ConsolidationView + 'static,
    {
        begin_run(view, accounts.len(), self.reporter.as_ref())?;

        let run = self.engine.run(accounts, options);
        let reporter = Arc::clone(&self.reporter);
        notify_on_owner(run, owner, move |view: &mut V, outcome| {
            finish_run(view, &outcome, reporter.as_ref());
        });

        Ok(())
    }

    /// Start a run and wait for it (await style)
    ///
    /// Intended to run as a task on the owner context (see
    /// [`OwnerHandle::spawn`]). Run outcomes, failures included, are
    /// presented on the view; the returned error only covers the trigger
    /// being rejected or the owner going away.
    pub async fn trigger_and_wait<V>(
        &self,
        owner: &OwnerHandle<V>,
        accounts: Vec<AccountRecord>,
        options: RunOptions,
    ) -> Result<(), ConsolidationError>
    where
        V: ConsolidationView + 'static,
    {
        let total = accounts.len();
        let reporter = Arc::clone(&self.reporter);
        owner
            .call(move |view: &mut V| begin_run(view, total, reporter.as_ref()))
            .await??;

        let outcome = self.engine.run(accounts, options).await;

        let reporter = Arc::clone(&self.reporter);
        owner
            .call(move |view: &mut V| finish_run(view, &outcome, reporter.as_ref()))
            .await
    }
}

fn begin_run<V: ConsolidationView>(
    view: &mut V,
    total: usize,
    reporter: &dyn ProgressReporter,
) -> Result<(), ConsolidationError> {
    if view.is_busy() {
        warn!(total, "trigger ignored: a run is already in progress");
        return Err(ConsolidationError::RunInProgress);
    }

    view.set_busy(true);
    view.update_view(&[], Duration::ZERO);
    reporter.on_started(total);
    Ok(())
}

fn finish_run<V: ConsolidationView>(
    view: &mut V,
    outcome: &RunOutcome,
    reporter: &dyn ProgressReporter,
) {
    match outcome {
        Ok(run) => view.update_view(run.results(), run.elapsed()),
        Err(error) => view.show_error(error),
    }
    view.set_busy(false);
    reporter.on_finished(outcome);
}
