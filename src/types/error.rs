//! Error types for the account consolidator
//!
//! This module defines all error types that can occur while loading accounts,
//! running a consolidation batch, and delivering the outcome to the owner
//! context. Errors are designed to be descriptive and user-friendly for CLI
//! output.
//!
//! # Error Categories
//!
//! - **Input Errors**: File not found, I/O errors, malformed CSV
//! - **Item Errors**: One consolidation call failed (`ItemFailure`)
//! - **Run Outcomes**: Aggregate failure, cancellation, timeout
//! - **Owner Errors**: Run already in progress, owner context gone

use std::time::Duration;

use thiserror::Error;

use super::account::AccountId;

/// A single consolidation call that failed
///
/// Captured per slot: `index` is the position of the account in the run's
/// input, so failures are never confused with one another or lost.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("account {account} (item {index}) failed: {error}")]
pub struct ItemFailure {
    /// Position of the account in the run input
    pub index: usize,
    /// The account whose consolidation failed
    pub account: AccountId,
    /// What the consolidation call (or its task) failed with
    pub error: ConsolidationError,
}

/// Main error type for the account consolidator
///
/// Every variant carries enough context to tell a partial failure apart
/// from a silent drop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsolidationError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable when reading accounts: the row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Summing an account's movements overflowed
    #[error("Arithmetic overflow while consolidating account {account}")]
    ArithmeticOverflow {
        /// The account being consolidated
        account: AccountId,
    },

    /// The consolidation function rejected an account
    #[error("Account {account} could not be consolidated: {message}")]
    ConsolidationFailed {
        /// The account being consolidated
        account: AccountId,
        /// Description of the failure
        message: String,
    },

    /// One or more work units failed
    ///
    /// The run resolves as failed; no partial results are exposed.
    #[error(
        "{} of {total} accounts failed ({succeeded} of {total} succeeded){}",
        failures.len(),
        failures.first().map(|f| format!("; first: {}", f)).unwrap_or_default()
    )]
    AggregateFailure {
        /// Every captured failure, in input order
        failures: Vec<ItemFailure>,
        /// Number of units that produced a result
        succeeded: usize,
        /// Number of accounts in the run
        total: usize,
    },

    /// Cancellation was requested before the run completed
    #[error("Run cancelled after {completed} of {total} accounts completed")]
    Cancelled {
        /// Units that finished before the run wound down
        completed: usize,
        /// Number of accounts in the run
        total: usize,
    },

    /// The run did not reach its fan-in barrier in time
    #[error("Run timed out after {}ms ({completed} of {total} accounts completed)", timeout.as_millis())]
    TimedOut {
        /// The configured timeout
        timeout: Duration,
        /// Units that finished before the run wound down
        completed: usize,
        /// Number of accounts in the run
        total: usize,
    },

    /// A run was triggered while another one is still in flight for the same owner
    #[error("A consolidation run is already in progress")]
    RunInProgress,

    /// The owner context has shut down and can no longer accept callbacks
    #[error("Owner context is closed")]
    OwnerClosed,

    /// The async runtime failed (task aborted, runtime could not start)
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the runtime error
        message: String,
    },
}

// Conversion from io::Error to ConsolidationError
impl From<std::io::Error> for ConsolidationError {
    fn from(error: std::io::Error) -> Self {
        ConsolidationError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to ConsolidationError
impl From<csv::Error> for ConsolidationError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ConsolidationError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl ConsolidationError {
    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(account: AccountId) -> Self {
        ConsolidationError::ArithmeticOverflow { account }
    }

    /// Create a ConsolidationFailed error
    pub fn consolidation_failed(account: AccountId, message: &str) -> Self {
        ConsolidationError::ConsolidationFailed {
            account,
            message: message.to_string(),
        }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl ToString) -> Self {
        ConsolidationError::Runtime {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn failure(index: usize, account: AccountId) -> ItemFailure {
        ItemFailure {
            index,
            account,
            error: ConsolidationError::consolidation_failed(account, "boom"),
        }
    }

    #[rstest]
    #[case::file_not_found(
        ConsolidationError::FileNotFound { path: "accounts.csv".to_string() },
        "File not found: accounts.csv"
    )]
    #[case::io_error(
        ConsolidationError::IoError { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    #[case::parse_error_with_line(
        ConsolidationError::ParseError { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        ConsolidationError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::arithmetic_overflow(
        ConsolidationError::ArithmeticOverflow { account: 3 },
        "Arithmetic overflow while consolidating account 3"
    )]
    #[case::aggregate_single(
        ConsolidationError::AggregateFailure { failures: vec![failure(0, 9)], succeeded: 0, total: 1 },
        "1 of 1 accounts failed (0 of 1 succeeded); first: account 9 (item 0) failed: Account 9 could not be consolidated: boom"
    )]
    #[case::aggregate_many(
        ConsolidationError::AggregateFailure { failures: vec![failure(1, 2), failure(3, 4)], succeeded: 2, total: 4 },
        "2 of 4 accounts failed (2 of 4 succeeded); first: account 2 (item 1) failed: Account 2 could not be consolidated: boom"
    )]
    #[case::cancelled(
        ConsolidationError::Cancelled { completed: 0, total: 5 },
        "Run cancelled after 0 of 5 accounts completed"
    )]
    #[case::timed_out(
        ConsolidationError::TimedOut { timeout: Duration::from_millis(250), completed: 3, total: 4 },
        "Run timed out after 250ms (3 of 4 accounts completed)"
    )]
    #[case::run_in_progress(
        ConsolidationError::RunInProgress,
        "A consolidation run is already in progress"
    )]
    fn test_error_display(#[case] error: ConsolidationError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::arithmetic_overflow(
        ConsolidationError::arithmetic_overflow(1),
        ConsolidationError::ArithmeticOverflow { account: 1 }
    )]
    #[case::consolidation_failed(
        ConsolidationError::consolidation_failed(2, "no movements"),
        ConsolidationError::ConsolidationFailed { account: 2, message: "no movements".to_string() }
    )]
    #[case::runtime(
        ConsolidationError::runtime("worker gone"),
        ConsolidationError::Runtime { message: "worker gone".to_string() }
    )]
    fn test_helper_functions(#[case] result: ConsolidationError, #[case] expected: ConsolidationError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_item_failure_keeps_typed_error() {
        let failure = ItemFailure {
            index: 2,
            account: 7,
            error: ConsolidationError::arithmetic_overflow(7),
        };

        assert_eq!(failure.error, ConsolidationError::ArithmeticOverflow { account: 7 });
        assert_eq!(
            failure.to_string(),
            "account 7 (item 2) failed: Arithmetic overflow while consolidating account 7"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: ConsolidationError = io_error.into();
        assert!(matches!(error, ConsolidationError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
