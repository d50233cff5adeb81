//! Batch run types
//!
//! A `BatchRun` is the frozen record of one successful engine invocation:
//! the materialized input, both timestamps, and one result per account.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::account::AccountRecord;

/// Summary produced by the consolidation function for one account
///
/// Carries no identity beyond its value. Its position inside a `BatchRun`
/// links it to the account at the same index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConsolidationResult(String);

impl ConsolidationResult {
    pub fn new(summary: impl Into<String>) -> Self {
        ConsolidationResult(summary.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ConsolidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConsolidationResult {
    fn from(value: &str) -> Self {
        ConsolidationResult::new(value)
    }
}

impl From<String> for ConsolidationResult {
    fn from(value: String) -> Self {
        ConsolidationResult(value)
    }
}

/// One completed consolidation run
///
/// Only the engine can build a `BatchRun`, and it does so after the fan-in
/// barrier has passed, so every instance is already complete and read-only.
///
/// # Invariants
///
/// - `results().len() == accounts().len()`
/// - `results()[i]` is the summary of `accounts()[i]`
/// - `completed_at() >= started_at()`
#[derive(Debug, Clone)]
pub struct BatchRun {
    accounts: Arc<[AccountRecord]>,
    results: Vec<ConsolidationResult>,
    started_at: Instant,
    completed_at: Instant,
}

impl BatchRun {
    pub(crate) fn complete(
        accounts: Arc<[AccountRecord]>,
        results: Vec<ConsolidationResult>,
        started_at: Instant,
    ) -> Self {
        debug_assert_eq!(accounts.len(), results.len());
        Self {
            accounts,
            results,
            started_at,
            completed_at: Instant::now().max(started_at),
        }
    }

    /// Input accounts, in the order they were submitted
    pub fn accounts(&self) -> &[AccountRecord] {
        &self.accounts
    }

    /// Results, index-aligned with `accounts()`
    pub fn results(&self) -> &[ConsolidationResult] {
        &self.results
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn completed_at(&self) -> Instant {
        self.completed_at
    }

    /// Wall time between trigger and the fan-in barrier passing
    pub fn elapsed(&self) -> Duration {
        self.completed_at.duration_since(self.started_at)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Pairs each account with its result
    pub fn iter(&self) -> impl Iterator<Item = (&AccountRecord, &ConsolidationResult)> {
        self.accounts.iter().zip(self.results.iter())
    }
}
