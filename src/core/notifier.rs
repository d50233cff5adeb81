//! Completion notifier
//!
//! Bridges a run that completes somewhere on the worker pool back to the
//! owner context. The owner handle is captured when the notifier is
//! registered, before the caller goes on to do anything else, and the
//! callback is posted to it exactly once.

use tracing::warn;

use super::engine::RunHandle;
use super::owner::OwnerHandle;
use crate::types::RunOutcome;

/// Deliver the outcome of `run` to `owner`
///
/// `callback` runs on the owner context after the run resolves, whatever the
/// outcome (success, aggregate failure, cancellation, timeout). It runs
/// exactly once; if the owner context has already shut down the outcome is
/// logged and dropped instead.
pub fn notify_on_owner<V, F>(run: RunHandle, owner: &OwnerHandle<V>, callback: F)
where
    V: 'static,
    F: FnOnce(&mut V, RunOutcome) + Send + 'static,
{
    let owner = owner.clone();
    let runtime = run.runtime().clone();

    runtime.spawn(async move {
        let outcome = run.await;
        let succeeded = outcome.is_ok();

        if owner
            .post(move |view: &mut V| callback(view, outcome))
            .is_err()
        {
            warn!(succeeded, "owner context closed before the run completed; outcome dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::{ConsolidationEngine, RunOptions};
    use crate::core::owner::OwnerContext;
    use crate::types::{AccountRecord, ConsolidationError, ConsolidationResult};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread::{self, ThreadId};

    type ConsolidateResult = Result<ConsolidationResult, ConsolidationError>;

    #[derive(Default)]
    struct Delivered {
        outcomes: Vec<(ThreadId, Result<usize, ConsolidationError>)>,
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_success_is_delivered_on_owner_thread() {
        let runtime = runtime();
        let engine = ConsolidationEngine::new(
            Arc::new(|account: &AccountRecord| -> ConsolidateResult {
                Ok(ConsolidationResult::new(account.holder.clone()))
            }),
            runtime.handle().clone(),
        );
        let owner = OwnerContext::spawn("notifier-ok", Delivered::default).unwrap();
        let (done_tx, done_rx) = mpsc::channel();

        let run = engine.run(
            vec![AccountRecord::new(1, "a"), AccountRecord::new(2, "b")],
            RunOptions::new(),
        );
        notify_on_owner(run, &owner.handle(), move |view: &mut Delivered, outcome| {
            view.outcomes
                .push((thread::current().id(), outcome.map(|run| run.len())));
            done_tx.send(()).unwrap();
        });

        done_rx.recv().unwrap();
        let delivered = owner
            .handle()
            .call_blocking(|view| view.outcomes.clone())
            .unwrap();

        assert_eq!(delivered, vec![(owner.thread_id(), Ok(2))]);
        owner.join().unwrap();
    }

    #[test]
    fn test_failure_is_still_marshaled_to_owner() {
        let runtime = runtime();
        let engine = ConsolidationEngine::new(
            Arc::new(|account: &AccountRecord| -> ConsolidateResult {
                Err(ConsolidationError::consolidation_failed(account.id, "rejected"))
            }),
            runtime.handle().clone(),
        );
        let owner = OwnerContext::spawn("notifier-err", Delivered::default).unwrap();
        let (done_tx, done_rx) = mpsc::channel();

        let run = engine.run(vec![AccountRecord::new(9, "z")], RunOptions::new());
        notify_on_owner(run, &owner.handle(), move |view: &mut Delivered, outcome| {
            view.outcomes
                .push((thread::current().id(), outcome.map(|run| run.len())));
            done_tx.send(()).unwrap();
        });

        done_rx.recv().unwrap();
        let delivered = owner
            .handle()
            .call_blocking(|view| view.outcomes.clone())
            .unwrap();

        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, owner.thread_id());
        assert!(matches!(
            &delivered[0].1,
            Err(ConsolidationError::AggregateFailure { failures, .. }) if failures.len() == 1
        ));
        owner.join().unwrap();
    }
}
