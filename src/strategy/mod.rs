//! Processing strategy module for account consolidation
//!
//! This module defines the Strategy pattern for complete consolidation pipelines,
//! from loading accounts through running the engine to writing the results. The
//! strategies differ in how the owner context learns about a finished run:
//! a registered continuation or an awaited task.

use crate::cli::StrategyType;
use std::io::Write;
use std::path::Path;

pub mod r#await;
pub mod config;
pub mod continuation;
mod pipeline;

pub use self::r#await::AwaitStrategy;
pub use config::EngineConfig;
pub use continuation::ContinuationStrategy;

/// Processing strategy trait for complete consolidation pipelines
///
/// Each strategy must be able to read accounts from a CSV file, consolidate
/// them concurrently, and write one summary row per account to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Consolidate accounts from input file and write results to output
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input CSV file containing account movements
    /// * `output` - Mutable reference to a writer for outputting summaries
    ///
    /// # Returns
    ///
    /// * `Ok(())` if every account was consolidated and written
    /// * `Err(String)` if the run failed, was cancelled or timed out, or a
    ///   fatal I/O error occurred
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - Any account fails to consolidate (no partial output is written)
    /// - The run exceeds its configured timeout
    /// - Output cannot be written
    ///
    /// Malformed input rows are logged and skipped; they do not fail the run.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The completion style to use (Continuation or Await)
/// * `config` - Optional engine configuration; defaults are used when absent
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<EngineConfig>,
) -> Box<dyn ProcessingStrategy> {
    let config = config.unwrap_or_default();
    match strategy_type {
        StrategyType::Continuation => Box::new(ContinuationStrategy::new(config)),
        StrategyType::Await => Box::new(AwaitStrategy::new(config)),
    }
}
