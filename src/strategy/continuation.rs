//! Continuation-style processing strategy
//!
//! The run is started from a job posted to the owner context. The engine's
//! outcome is handed back through the completion notifier, which queues the
//! presentation step on the same owner context.

use std::io::Write;
use std::path::Path;

use crate::core::{OwnerHandle, RunOptions};
use crate::io::report::ReportView;
use crate::strategy::pipeline::{run_pipeline, PipelineController};
use crate::strategy::{EngineConfig, ProcessingStrategy};
use crate::types::{AccountRecord, ConsolidationError};

/// Processing strategy that registers a completion callback
#[derive(Debug, Clone, Default)]
pub struct ContinuationStrategy {
    config: EngineConfig,
}

impl ContinuationStrategy {
    /// Create a new ContinuationStrategy with the specified configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for ContinuationStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        run_pipeline(&self.config, input_path, output, start_with_continuation)
    }
}

fn start_with_continuation(
    owner: &OwnerHandle<ReportView>,
    controller: PipelineController,
    accounts: Vec<AccountRecord>,
    options: RunOptions,
) -> Result<(), ConsolidationError> {
    let handle = owner.clone();
    owner.post(move |view: &mut ReportView| {
        if let Err(e) = controller.trigger(view, &handle, accounts, options) {
            view.publish_error(e);
        }
    })
}
