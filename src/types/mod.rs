//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account records handed to the engine
//! - `batch_run`: Completed runs and per-account results
//! - `error`: Error types for the consolidator

pub mod account;
pub mod batch_run;
pub mod error;

pub use account::{AccountId, AccountRecord};
pub use batch_run::{BatchRun, ConsolidationResult};
pub use error::{ConsolidationError, ItemFailure};

/// What a run resolves with: a frozen batch or the reason it failed
pub type RunOutcome = Result<BatchRun, ConsolidationError>;
