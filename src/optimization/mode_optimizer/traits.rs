//! Public API surface for mode estimation.
//!
//! - [`DensityEvaluator`]: trait the unnormalized posterior implements.
//! - [`CellProblem`]: one cell's counts and priors, handed to the evaluator.
//! - [`ModeOptions`], [`Strata`] and [`EvalSettings`]: configuration.
//! - [`ModeOutcome`]: normalized result of a single-cell search.
//!
//! Convention: we *maximize* the density `f(λ)`. The argmin layer sees the
//! cost `-f(λ)` at the current candidate; the search itself compares
//! densities directly.
use argmin::core::{TerminationReason, TerminationStatus};
use log::warn;

use crate::{
    optimization::{
        errors::{ModeError, ModeResult},
        mode_optimizer::{
            bracket::Bracket,
            types::{
                Candidates, DEFAULT_MAX_ITER, DEFAULT_N_SIM, DEFAULT_REL_TOL, DEFAULT_STRATA,
                Densities, FnEvalMap,
            },
            validation::{
                validate_mode, verify_max_iter, verify_n_sim, verify_n_threads, verify_rel_tol,
                verify_strata,
            },
        },
    },
    priors::CellPriors,
};

/// Counts and priors for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellProblem {
    pub n_mno: u64,
    pub n_reg: u64,
    pub priors: CellPriors,
}

impl CellProblem {
    pub fn new(n_mno: u64, n_reg: u64, priors: CellPriors) -> Self {
        Self { n_mno, n_reg, priors }
    }

    /// Initial search bracket for this cell's counts.
    pub fn bracket(&self) -> Bracket {
        Bracket::from_counts(self.n_mno, self.n_reg)
    }
}

/// Evaluator output: the candidates and one density per candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityTable {
    pub lambda: Candidates,
    pub density: Densities,
}

impl DensityTable {
    pub fn new(lambda: Candidates, density: Densities) -> Self {
        Self { lambda, density }
    }
}

/// Unnormalized posterior density of λ for one cell.
///
/// Implementations may be expensive and stochastic (Monte Carlo over the
/// auxiliary `u`, `v` variables); the optimizer treats them as a black box.
///
/// - `lambdas`: candidate values, all strictly positive; zero-count cells
///   never reach the evaluator.
/// - `cell`: counts and the three sliced priors.
/// - `settings`: tolerance, Monte Carlo sample count, stratification,
///   verbosity and thread count, forwarded from [`ModeOptions`].
///
/// Return one density per candidate, in order. Non-finite values are
/// rejected by the optimizer with [`ModeError::NonFiniteDensity`].
pub trait DensityEvaluator {
    fn evaluate(
        &self, lambdas: &Candidates, cell: &CellProblem, settings: &EvalSettings,
    ) -> ModeResult<DensityTable>;
}

impl<D: DensityEvaluator + ?Sized> DensityEvaluator for &D {
    fn evaluate(
        &self, lambdas: &Candidates, cell: &CellProblem, settings: &EvalSettings,
    ) -> ModeResult<DensityTable> {
        (**self).evaluate(lambdas, cell, settings)
    }
}

/// Deterministic evaluator built from a pointwise closure `f(λ, cell)`.
///
/// Ignores `settings`; useful for synthetic densities and tests.
#[derive(Debug, Clone, Copy)]
pub struct FnDensity<F>(pub F);

impl<F> FnDensity<F>
where
    F: Fn(f64, &CellProblem) -> f64,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> DensityEvaluator for FnDensity<F>
where
    F: Fn(f64, &CellProblem) -> f64,
{
    fn evaluate(
        &self, lambdas: &Candidates, cell: &CellProblem, _settings: &EvalSettings,
    ) -> ModeResult<DensityTable> {
        let density = lambdas.mapv(|lambda| (self.0)(lambda, cell));
        Ok(DensityTable::new(lambdas.clone(), density))
    }
}

/// Two-element stratification forwarded to the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strata(pub [usize; 2]);

impl Strata {
    pub fn new(first: usize, second: usize) -> ModeResult<Self> {
        Self::try_from(&[first, second][..])
    }
}

impl Default for Strata {
    fn default() -> Self {
        Self(DEFAULT_STRATA)
    }
}

impl TryFrom<&[usize]> for Strata {
    type Error = ModeError;

    fn try_from(strata: &[usize]) -> Result<Self, Self::Error> {
        verify_strata(strata)?;
        Ok(Self([strata[0], strata[1]]))
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `rel_tol`: relative tolerance on density differences (also forwarded
///   to the evaluator's special-function approximations).
/// - `n_sim`: Monte Carlo sample count forwarded to the evaluator.
/// - `n_strata`: stratification forwarded to the evaluator.
/// - `verbose`: progress reporting; attaches an argmin observer behind the
///   `obs_slog` feature and switches the default cell reporter to `log`.
/// - `n_threads`: thread count; `None` means all available cores.
/// - `max_iter`: iteration budget per cell.
/// - `parallel_cells`: run cells on a dedicated rayon pool.
///
/// Default:
/// - `rel_tol = 1e-6`, `n_sim = 10_000`, `n_strata = [1, 100]`,
///   `verbose = false`, `n_threads = None`, `max_iter = 1000`,
///   `parallel_cells = false`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeOptions {
    pub rel_tol: f64,
    pub n_sim: usize,
    pub n_strata: Strata,
    pub verbose: bool,
    pub n_threads: Option<usize>,
    pub max_iter: usize,
    pub parallel_cells: bool,
}

impl ModeOptions {
    /// Create validated options.
    ///
    /// # Errors
    /// - [`ModeError::InvalidRelTol`] for a non-finite or non-positive `rel_tol`.
    /// - [`ModeError::InvalidSimCount`] if `n_sim == 0`.
    /// - [`ModeError::InvalidThreadCount`] if `n_threads == Some(0)`.
    /// - [`ModeError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        rel_tol: f64, n_sim: usize, n_strata: Strata, verbose: bool, n_threads: Option<usize>,
        max_iter: usize,
    ) -> ModeResult<Self> {
        let opts =
            Self { rel_tol, n_sim, n_strata, verbose, n_threads, max_iter, parallel_cells: false };
        opts.validate()?;
        Ok(opts)
    }

    /// Run the construction checks on options that may have been built as a
    /// struct literal.
    ///
    /// # Errors
    /// Same as [`ModeOptions::new`].
    pub fn validate(&self) -> ModeResult<()> {
        verify_rel_tol(self.rel_tol)?;
        verify_n_sim(self.n_sim)?;
        verify_strata(&self.n_strata.0)?;
        verify_n_threads(self.n_threads)?;
        verify_max_iter(self.max_iter)
    }

    /// Same options with cell-level parallelism switched on or off.
    pub fn with_parallel_cells(mut self, parallel_cells: bool) -> Self {
        self.parallel_cells = parallel_cells;
        self
    }

    /// Thread count with `None` resolved to the available parallelism.
    pub fn resolved_threads(&self) -> usize {
        self.n_threads.unwrap_or_else(|| {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        })
    }

    /// Settings forwarded to the density evaluator.
    pub fn eval_settings(&self) -> EvalSettings {
        EvalSettings {
            rel_tol: self.rel_tol,
            n_sim: self.n_sim,
            n_strata: self.n_strata,
            verbose: self.verbose,
            n_threads: self.resolved_threads(),
        }
    }
}

impl Default for ModeOptions {
    fn default() -> Self {
        Self {
            rel_tol: DEFAULT_REL_TOL,
            n_sim: DEFAULT_N_SIM,
            n_strata: Strata::default(),
            verbose: false,
            n_threads: None,
            max_iter: DEFAULT_MAX_ITER,
            parallel_cells: false,
        }
    }
}

/// Read-only evaluator settings derived from [`ModeOptions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalSettings {
    pub rel_tol: f64,
    pub n_sim: usize,
    pub n_strata: Strata,
    pub verbose: bool,
    pub n_threads: usize,
}

/// Result of a single-cell search.
///
/// - `mode`: the candidate best point when the stopping rule fired.
/// - `density`: density at `mode`; `None` when no evaluation took place.
/// - `bracket`: the initial bracket; `mode` always lies inside it.
/// - `converged`: `true` for a converged search or a degenerate bracket.
/// - `status`: human-readable termination status.
/// - `iterations`: golden-section iterations performed.
/// - `fn_evals`: argmin's evaluation counters (`cost_count` = evaluator
///   calls).
#[derive(Debug, Clone, PartialEq)]
pub struct ModeOutcome {
    pub mode: f64,
    pub density: Option<f64>,
    pub bracket: Bracket,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl ModeOutcome {
    /// Build a validated outcome from raw solver state.
    ///
    /// # Errors
    /// - Propagates [`validate_mode`] errors.
    /// - [`ModeError::IterationLimitReached`] if the budget ran out; the
    ///   best-effort point is carried in the error.
    pub fn new(
        mode: Option<f64>, density: f64, bracket: Bracket, termination: TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap, max_iter: usize,
    ) -> ModeResult<Self> {
        let mode = validate_mode(mode)?;
        let converged = match &termination {
            TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
                warn!("golden-section search hit {max_iter} iterations, best point {mode}");
                return Err(ModeError::IterationLimitReached { max_iter, best: mode });
            }
            TerminationStatus::Terminated(TerminationReason::SolverConverged) => true,
            _ => false,
        };
        let status = match termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            other => format!("{other:?}"),
        };
        Ok(Self {
            mode,
            density: density.is_finite().then_some(density),
            bracket,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
        })
    }

    /// Outcome for a zero-width bracket: the lower end, no evaluations.
    pub fn degenerate(bracket: Bracket) -> Self {
        Self {
            mode: bracket.lower,
            density: None,
            bracket,
            converged: true,
            status: "Degenerate bracket".to_string(),
            iterations: 0,
            fn_evals: FnEvalMap::new(),
        }
    }
}
