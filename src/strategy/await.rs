//! Await-style processing strategy
//!
//! The whole trigger/run/present flow is a single async task spawned on the
//! owner context. It suspends while the engine runs and resumes on the owner
//! context to present the outcome.

use std::io::Write;
use std::path::Path;

use tracing::warn;

use crate::core::{OwnerHandle, RunOptions};
use crate::io::report::ReportView;
use crate::strategy::pipeline::{run_pipeline, PipelineController};
use crate::strategy::{EngineConfig, ProcessingStrategy};
use crate::types::{AccountRecord, ConsolidationError};

/// Processing strategy that awaits the run on the owner context
#[derive(Debug, Clone, Default)]
pub struct AwaitStrategy {
    config: EngineConfig,
}

impl AwaitStrategy {
    /// Create a new AwaitStrategy with the specified configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AwaitStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        run_pipeline(&self.config, input_path, output, start_and_await)
    }
}

fn start_and_await(
    owner: &OwnerHandle<ReportView>,
    controller: PipelineController,
    accounts: Vec<AccountRecord>,
    options: RunOptions,
) -> Result<(), ConsolidationError> {
    owner.spawn(move |owner| async move {
        if let Err(e) = controller.trigger_and_wait(&owner, accounts, options).await {
            if owner.post(move |view: &mut ReportView| view.publish_error(e)).is_err() {
                warn!("owner context closed before the trigger error was reported");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_await_strategy_processes_accounts() {
        let file = create_temp_csv(
            "account,holder,amount\n\
             7,Gil,1.5\n\
             3,Carla,-4\n",
        );
        let strategy = AwaitStrategy::new(EngineConfig::new(2, Duration::from_millis(5), None));
        let mut output = Vec::new();

        strategy.process(file.path(), &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,holder,summary\n\
             7,Gil,\"Gil: 1 movements, balance 1.50\"\n\
             3,Carla,\"Carla: 1 movements, balance -4.00\"\n"
        );
    }

    #[test]
    fn test_await_strategy_empty_input_writes_header_only() {
        let file = create_temp_csv("account,holder,amount\n");
        let strategy = AwaitStrategy::default();
        let mut output = Vec::new();

        strategy.process(file.path(), &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "account,holder,summary\n");
    }

    #[test]
    fn test_await_strategy_reports_item_failure() {
        let file = create_temp_csv(&format!(
            "account,holder,amount\n1,Ana,1\n9,Max,{}\n9,Max,{}\n",
            rust_decimal::Decimal::MAX,
            rust_decimal::Decimal::MAX
        ));
        let strategy = AwaitStrategy::default();
        let mut output = Vec::new();

        let error = strategy.process(file.path(), &mut output).unwrap_err();

        assert!(error.contains("1 of 2 accounts failed"), "{}", error);
        assert!(error.contains("Arithmetic overflow while consolidating account 9"), "{}", error);
    }
}
