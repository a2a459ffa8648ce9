//! dispatch — run the mode search over a batch of cells.
//!
//! Purpose
//! -------
//! Accept count vectors of length `N` and batch-level priors whose
//! parameters are either shared or given per cell, and return one mode per
//! cell in input order.
//!
//! Key behaviors
//! -------------
//! - [`cells`]: up-front validation, per-cell slicing through
//!   [`PriorSet::slice`](crate::priors::PriorSet::slice), and sequential or
//!   rayon-parallel dispatch to
//!   [`estimate_mode`](crate::optimization::mode_optimizer::estimate_mode).
//! - [`progress`]: the injected [`ProgressReporter`] notified as cells start
//!   and finish.
//!
//! Invariants & assumptions
//! ------------------------
//! - Output position `i` always holds the mode for input cell `i`,
//!   regardless of execution order.
//! - Any cell failure fails the whole batch.

pub mod cells;
pub mod progress;

pub use self::cells::{
    CellCounts, Modes, estimate_mode_outcomes, estimate_modes, estimate_modes_with_progress,
    split_cells,
};
pub use self::progress::{LogProgress, NoProgress, ProgressReporter};
