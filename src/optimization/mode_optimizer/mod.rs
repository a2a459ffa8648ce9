//! mode_optimizer — argmin-powered golden-section search for the posterior
//! mode of λ in one cell.
//!
//! Purpose
//! -------
//! Locate the value of λ that maximizes an unnormalized posterior density
//! `f(λ)` supplied by an external [`DensityEvaluator`]. Each call to the
//! evaluator may be expensive and noisy (Monte Carlo), so the search makes
//! exactly one evaluation per iteration after a single batched evaluation of
//! the four starting points.
//!
//! Key behaviors
//! -------------
//! - Derive the initial bracket from the cell's counts via
//!   [`Bracket::from_counts`]: `[(nMNO + nReg)/4, 3(nMNO + nReg)/4]` with two
//!   golden-section interior points.
//! - Run [`solver::GoldenSectionMode`] through argmin's `Executor`, bridged
//!   to the evaluator by [`adapter::DensityAdapter`].
//! - Stop when the densities at the two interior points (or at the two
//!   bracket ends) agree to within `rel_tol` of the current best density,
//!   or when either sub-interval is narrower than `1e-8`.
//! - Expose a single entrypoint [`estimate_mode`] returning a
//!   [`ModeOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The four tracked points stay strictly ordered; every iteration shrinks
//!   the outer interval, and the returned mode lies inside the initial
//!   bracket.
//! - The evaluator returns one finite density per candidate, in order;
//!   anything else is a [`ModeError`](crate::optimization::errors::ModeError),
//!   never a panic.
//! - A zero-width bracket (both counts zero) returns the lower end without
//!   evaluating the density.
//!
//! Conventions
//! -----------
//! - The search *maximizes* `f(λ)`. The argmin state carries the negated
//!   density of the current candidate as its cost.
//! - Options flow unchanged into [`EvalSettings`] so the evaluator sees the
//!   same tolerance, sample count, strata, verbosity and thread count.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover bracket geometry ([`bracket`]), step
//!   direction and stopping rules ([`solver`]), evaluator output checks
//!   ([`adapter`], [`validation`]), and executor wiring ([`run`]).
//! - Integration tests exercise [`estimate_mode`] through the cell
//!   dispatcher on synthetic densities.

pub mod adapter;
pub mod api;
pub mod bracket;
pub mod run;
pub mod solver;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::estimate_mode;
pub use self::bracket::Bracket;
pub use self::traits::{
    CellProblem, DensityEvaluator, DensityTable, EvalSettings, FnDensity, ModeOptions,
    ModeOutcome, Strata,
};
pub use self::types::{Candidates, DEFAULT_MAX_ITER, DEFAULT_REL_TOL, Densities, FnEvalMap};

pub mod prelude {
    pub use super::api::estimate_mode;
    pub use super::bracket::Bracket;
    pub use super::traits::{
        CellProblem, DensityEvaluator, DensityTable, EvalSettings, FnDensity, ModeOptions,
        ModeOutcome, Strata,
    };
}
