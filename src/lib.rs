//! Account Consolidator Library
//! # Overview
//!
//! This library consolidates a batch of accounts concurrently: one work unit
//! per account fans out onto a worker pool, results are gathered back into
//! input order, and the outcome is delivered to a single owner context that
//! alone touches presentation state.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (AccountRecord, BatchRun, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Fan-out/fan-in batch consolidation
//!   - [`core::owner`] - Owner execution context and its handle
//!   - [`core::notifier`] - Delivery of run outcomes to the owner context
//!   - [`core::controller`] - Trigger guard and result presentation
//! - [`io`] - Account sources, result output and reporting
//! - [`strategy`] - Complete pipelines in continuation or await style
//!
//! # Run Outcomes
//!
//! A run resolves exactly once, and all-or-nothing:
//!
//! - **Success**: one result per account, in input order
//! - **AggregateFailure**: every failed account, with its position
//! - **Cancelled**: the caller's token fired before completion
//! - **TimedOut**: the run's deadline passed before completion

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    notify_on_owner, ConsolidationController, ConsolidationEngine, MovementConsolidator,
    OwnerContext, OwnerHandle, RunHandle, RunOptions,
};
pub use io::{summary_message, write_results_csv};
pub use types::{
    AccountId, AccountRecord, BatchRun, ConsolidationError, ConsolidationResult, ItemFailure,
    RunOutcome,
};
