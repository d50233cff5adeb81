//! Shared consolidation pipeline
//!
//! Both strategies run the same pipeline and differ only in how the run is
//! started on the owner context:
//!
//! ```text
//! CsvAccountSource ──> accounts
//!                          │
//!        ┌─────────────────┴──────────────────┐
//!        │ owner thread (ReportView)           │
//!        │   trigger ──> ConsolidationEngine ──┼──> runtime worker pool
//!        │   present <── completion notifier <─┘
//!        └─────────────────┬──────────────────┘
//!                          │ Report (channel)
//!                          v
//!                  write_results_csv
//! ```

use std::io::Write;
use std::path::Path;
use std::sync::{mpsc, Arc};

use tracing::debug;

use crate::core::{
    AccountSource, ConsolidationController, ConsolidationEngine, MovementConsolidator,
    OwnerContext, OwnerHandle, ProgressReporter, RunOptions, TracingReporter,
};
use crate::io::account_source::CsvAccountSource;
use crate::io::csv_format::write_results_csv;
use crate::io::report::ReportView;
use crate::strategy::EngineConfig;
use crate::types::{AccountRecord, ConsolidationError};

/// Controller type used by the command-line pipeline
pub(crate) type PipelineController = ConsolidationController<MovementConsolidator>;

/// Starts a run on the owner context
///
/// Errors returned here never reached the engine (e.g. the owner is gone).
pub(crate) type Starter = fn(
    &OwnerHandle<ReportView>,
    PipelineController,
    Vec<AccountRecord>,
    RunOptions,
) -> Result<(), ConsolidationError>;

/// Load accounts, run them through the engine, and write the results
pub(crate) fn run_pipeline(
    config: &EngineConfig,
    input_path: &Path,
    output: &mut dyn Write,
    start: Starter,
) -> Result<(), String> {
    let accounts = CsvAccountSource::new(input_path)
        .get_accounts()
        .map_err(|e| format!("Failed to load accounts: {}", e))?;
    debug!(accounts = accounts.len(), "accounts loaded");

    // Use multi-threaded runtime with configured number of worker threads
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

    let engine = ConsolidationEngine::new(
        Arc::new(MovementConsolidator::new(config.item_delay)),
        runtime.handle().clone(),
    );
    let reporter: Arc<dyn ProgressReporter> = Arc::new(TracingReporter);
    let controller = ConsolidationController::new(engine, reporter);

    let (report_tx, report_rx) = mpsc::channel();
    let owner = OwnerContext::spawn("consolidation-owner", move || ReportView::new(report_tx))
        .map_err(|e| format!("Failed to start owner context: {}", e))?;

    start(
        &owner.handle(),
        controller,
        accounts.clone(),
        config.run_options(),
    )
    .map_err(|e| format!("Failed to start consolidation: {}", e))?;

    let report = report_rx
        .recv()
        .map_err(|_| "Owner context stopped before the run finished".to_string())?;

    owner
        .join()
        .map_err(|e| format!("Failed to stop owner context: {}", e))?;

    let (results, _elapsed) = report.map_err(|e| format!("Consolidation run failed: {}", e))?;

    write_results_csv(&accounts, &results, output)
}
