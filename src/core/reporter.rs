//! Progress reporting through `tracing`

use tracing::{debug, error, info};

use super::traits::ProgressReporter;
use crate::io::report::summary_message;
use crate::types::RunOutcome;

/// Reporter that turns run transitions into log events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn on_started(&self, total: usize) {
        info!(total, "consolidating accounts");
    }

    fn on_item_completed(&self, index: usize) {
        debug!(index, "account settled");
    }

    fn on_finished(&self, outcome: &RunOutcome) {
        match outcome {
            Ok(run) => info!("{}", summary_message(run.len(), run.elapsed())),
            Err(e) => error!(error = %e, "consolidation run failed"),
        }
    }
}
