//! lambda_mode — posterior-mode estimation for per-cell population
//! parameters.
//!
//! Purpose
//! -------
//! Estimate, for each territorial cell, the λ that maximizes the
//! unnormalized posterior density linking a network-detected count (`nMNO`)
//! to a register count (`nReg`) under priors on `u`, `v` and `λ`. The
//! density itself is supplied by the caller through
//! [`DensityEvaluator`](optimization::mode_optimizer::DensityEvaluator); this
//! crate owns the bracket, the search, the per-cell dispatch and the error
//! surface.
//!
//! Key behaviors
//! -------------
//! - [`priors`]: tagged prior families with shared or per-cell parameters.
//! - [`optimization`]: the argmin-backed golden-section search for one cell
//!   and the crate-wide [`ModeError`](optimization::errors::ModeError).
//! - [`dispatch`]: validation and slicing of batch inputs, then sequential or
//!   parallel per-cell dispatch with ordered results.
//!
//! Conventions
//! -----------
//! - Counts are non-negative integers (`u64`); λ and densities are `f64`.
//! - Vectors use `ndarray::Array1`.
//! - Diagnostics go through the `log` facade; binaries choose the logger.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code in each module.
//! - `tests/integration_mode_pipeline.rs` runs full batches through
//!   [`dispatch::estimate_modes`] with deterministic synthetic densities.

pub mod dispatch;
pub mod optimization;
pub mod priors;

pub use crate::dispatch::{CellCounts, Modes, estimate_modes};
pub use crate::optimization::errors::{ErrorKind, ModeError, ModeResult};
pub use crate::optimization::mode_optimizer::{
    CellProblem, DensityEvaluator, ModeOptions, ModeOutcome, estimate_mode,
};
pub use crate::priors::{Prior, PriorSet, PriorSpec};
