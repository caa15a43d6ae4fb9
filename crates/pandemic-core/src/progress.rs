//! Progress reporting for the adjacency pass.
//!
//! Purely observational: sinks see row indices but cannot influence the
//! aggregation.

use tracing::info;

/// Receives progress notifications from the aggregator.
pub trait ProgressSink {
    /// Called after row `row` (zero-based) added a neighborhood entry.
    fn row_processed(&mut self, row: usize, total: usize);

    /// Called once after the last row.
    fn finished(&mut self, last_row: usize, total: usize);
}

/// Logs a percentage every `interval` rows and once at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogProgress {
    interval: usize,
}

impl LogProgress {
    /// Report every `interval` rows. An interval of zero only reports
    /// completion.
    pub const fn new(interval: usize) -> Self {
        Self { interval }
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(row: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    100.0 * row as f64 / total as f64
}

impl ProgressSink for LogProgress {
    fn row_processed(&mut self, row: usize, total: usize) {
        if row.checked_rem(self.interval) != Some(0) {
            return;
        }
        info!(row, total, "{:.2}%", percent(row, total));
    }

    fn finished(&mut self, last_row: usize, total: usize) {
        info!(row = last_row, total, "{:.1}%", percent(last_row, total).ceil());
    }
}

/// Reports completion only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuietProgress;

impl ProgressSink for QuietProgress {
    fn row_processed(&mut self, _row: usize, _total: usize) {}

    fn finished(&mut self, _last_row: usize, _total: usize) {
        info!("Done.");
    }
}
