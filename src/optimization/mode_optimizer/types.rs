//! mode_optimizer::types — shared numeric aliases and search constants.
//!
//! Purpose
//! -------
//! Centralize the numeric shapes and constants used by the golden-section
//! mode search so the solver, adapter and runner agree on them without
//! repeating `ndarray` and argmin generics.
//!
//! Conventions
//! -----------
//! - Candidate λ values and their densities travel as `Array1<f64>` of equal
//!   length, in the same order.
//! - The argmin state carries a scalar parameter (the current candidate
//!   mode) and a scalar cost equal to the **negated** density at that point.
use std::collections::HashMap;

use argmin::core::IterState;
use ndarray::Array1;

/// Candidate λ values passed to a density evaluator.
pub type Candidates = Array1<f64>;

/// Unnormalized densities, one per candidate, same order.
pub type Densities = Array1<f64>;

/// Function-evaluation counters as reported by argmin.
pub type FnEvalMap = HashMap<String, u64>;

/// Argmin state used by the golden-section solver: scalar parameter, no
/// derivatives, scalar cost.
pub type ModeState = IterState<f64, (), (), (), (), f64>;

/// Golden-ratio conjugate `φ = (√5 − 1) / 2`.
pub const PHI: f64 = 0.618_033_988_749_894_9;

/// Bracket sub-interval width below which the search stops.
pub const ABS_WIDTH_TOL: f64 = 1e-8;

/// Default relative tolerance on density differences.
pub const DEFAULT_REL_TOL: f64 = 1e-6;

/// Default Monte Carlo sample count forwarded to the evaluator.
pub const DEFAULT_N_SIM: usize = 10_000;

/// Default two-element stratification forwarded to the evaluator.
pub const DEFAULT_STRATA: [usize; 2] = [1, 100];

/// Default iteration budget for one cell.
pub const DEFAULT_MAX_ITER: usize = 1_000;
