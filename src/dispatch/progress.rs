//! Per-cell progress notifications.
//!
//! The dispatcher reports each cell's start and finish to an injected
//! [`ProgressReporter`]. Reporters never influence control flow or results;
//! with parallel cells, notifications may arrive out of input order.
use log::info;

use crate::optimization::mode_optimizer::ModeOutcome;

pub trait ProgressReporter: Sync {
    fn cell_started(&self, _index: usize, _total: usize) {}
    fn cell_finished(&self, _index: usize, _total: usize, _outcome: &ModeOutcome) {}
}

/// Silent reporter; the default when `verbose` is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// Reporter that emits one `log::info!` line per finished cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn cell_finished(&self, index: usize, total: usize, outcome: &ModeOutcome) {
        info!(
            "cell {}/{}: mode = {:.6} after {} iterations ({})",
            index + 1,
            total,
            outcome.mode,
            outcome.iterations,
            outcome.status
        );
    }
}
