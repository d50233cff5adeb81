//! Core traits for the consolidation pipeline
//!
//! This module defines the seams between the engine and its collaborators:
//! where accounts come from, how one account is consolidated, what the owner
//! context displays, and who hears about progress.

use std::time::Duration;

use crate::types::{AccountRecord, ConsolidationError, ConsolidationResult, RunOutcome};

/// Trait for supplying the accounts of a run
///
/// Returns an already-materialized, ordered collection. No paging.
pub trait AccountSource {
    /// Get every account to consolidate, in order
    fn get_accounts(&self) -> Result<Vec<AccountRecord>, ConsolidationError>;
}

/// Trait for consolidating the movements of one account
///
/// Implementations are called concurrently from worker threads for
/// different accounts, may block, and must not depend on shared mutable
/// state.
pub trait Consolidate: Send + Sync + 'static {
    /// Consolidate a single account
    fn consolidate(&self, account: &AccountRecord)
        -> Result<ConsolidationResult, ConsolidationError>;
}

impl<F> Consolidate for F
where
    F: Fn(&AccountRecord) -> Result<ConsolidationResult, ConsolidationError>
        + Send
        + Sync
        + 'static,
{
    fn consolidate(
        &self,
        account: &AccountRecord,
    ) -> Result<ConsolidationResult, ConsolidationError> {
        self(account)
    }
}

/// Trait for the owner-exclusive display state
///
/// Only ever called on the owner context.
pub trait ConsolidationView {
    /// Whether a run is currently in flight (trigger disabled)
    fn is_busy(&self) -> bool;

    /// Enable or disable the trigger
    fn set_busy(&mut self, busy: bool);

    /// Replace the displayed results and elapsed time
    fn update_view(&mut self, results: &[ConsolidationResult], elapsed: Duration);

    /// Present a failed run
    fn show_error(&mut self, error: &ConsolidationError);
}

/// Trait for observing run progress
///
/// `on_started` and `on_finished` are invoked on the owner context.
/// `on_item_completed` is invoked from the engine's fan-in task as each
/// unit settles, in completion order.
pub trait ProgressReporter: Send + Sync {
    /// A run was triggered for `total` accounts
    fn on_started(&self, total: usize);

    /// The unit at `index` settled (success or failure)
    fn on_item_completed(&self, _index: usize) {}

    /// The run resolved
    fn on_finished(&self, outcome: &RunOutcome);
}
