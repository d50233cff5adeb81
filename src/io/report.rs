//! Run reporting
//!
//! Formats the human-readable run summary and provides `ReportView`, the
//! view used by the command-line pipeline. The view lives on the owner
//! context and publishes the final state of every run over a channel once
//! the run goes idle, so the thread that started the owner can pick it up.

use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::debug;

use crate::core::ConsolidationView;
use crate::types::{ConsolidationError, ConsolidationResult};

/// What a finished run leaves on the view
pub type Report = Result<(Vec<ConsolidationResult>, Duration), ConsolidationError>;

/// Format the completion summary of a run
///
/// # Example
///
/// ```
/// use account_consolidator::io::report::summary_message;
/// use std::time::Duration;
///
/// assert_eq!(
///     summary_message(4, Duration::from_millis(1053)),
///     "Processed 4 accounts in 1.053 seconds"
/// );
/// ```
pub fn summary_message(count: usize, elapsed: Duration) -> String {
    format!(
        "Processed {} accounts in {}.{:03} seconds",
        count,
        elapsed.as_secs(),
        elapsed.subsec_millis()
    )
}

/// View that hands each finished run to a channel
pub struct ReportView {
    busy: bool,
    results: Vec<ConsolidationResult>,
    elapsed: Duration,
    error: Option<ConsolidationError>,
    publisher: Sender<Report>,
}

impl ReportView {
    pub fn new(publisher: Sender<Report>) -> Self {
        Self {
            busy: false,
            results: Vec::new(),
            elapsed: Duration::ZERO,
            error: None,
            publisher,
        }
    }

    /// Publish an error that never reached a run, e.g. a rejected trigger
    pub fn publish_error(&self, error: ConsolidationError) {
        if self.publisher.send(Err(error)).is_err() {
            debug!("report receiver dropped");
        }
    }

    fn publish(&self) {
        let report = match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok((self.results.clone(), self.elapsed)),
        };
        if self.publisher.send(report).is_err() {
            debug!("report receiver dropped");
        }
    }
}

impl ConsolidationView for ReportView {
    fn is_busy(&self) -> bool {
        self.busy
    }

    fn set_busy(&mut self, busy: bool) {
        let finished = self.busy && !busy;
        self.busy = busy;
        if finished {
            self.publish();
        }
    }

    fn update_view(&mut self, results: &[ConsolidationResult], elapsed: Duration) {
        self.results = results.to_vec();
        self.elapsed = elapsed;
        self.error = None;
    }

    fn show_error(&mut self, error: &ConsolidationError) {
        self.results.clear();
        self.error = Some(error.clone());
    }
}
