//! Execution helper that runs the golden-section solver on one cell and
//! returns a crate-friendly [`ModeOutcome`].
use argmin::core::{Executor, State};
#[cfg(feature = "obs_slog")]
use argmin::core::observers::ObserverMode;
use log::debug;

use crate::optimization::{
    errors::ModeResult,
    mode_optimizer::{
        adapter::DensityAdapter,
        bracket::Bracket,
        solver::GoldenSectionMode,
        traits::{DensityEvaluator, ModeOptions, ModeOutcome},
    },
};

/// Run the golden-section search for one cell.
///
/// Wires up:
/// - the evaluator via [`DensityAdapter`],
/// - a [`GoldenSectionMode`] solver over `bracket` with `opts.rel_tol`,
/// - `opts.max_iter` as argmin's `max_iters`,
/// - a terminal slog observer when `opts.verbose` and the `obs_slog`
///   feature are both on,
///
/// then executes the solver and converts the final state into a
/// [`ModeOutcome`]. The reported mode is the solver's last candidate, not
/// argmin's best-so-far parameter.
///
/// # Errors
/// - [`ModeError::DegenerateBracket`](crate::optimization::errors::ModeError::DegenerateBracket)
///   if `bracket` has no interior.
/// - Evaluator and validation errors raised inside the adapter.
/// - [`ModeError::IterationLimitReached`](crate::optimization::errors::ModeError::IterationLimitReached)
///   if the budget runs out before the stopping rule fires.
pub fn run_golden_section<D: DensityEvaluator>(
    bracket: Bracket, opts: &ModeOptions, problem: DensityAdapter<'_, D>,
) -> ModeResult<ModeOutcome> {
    let solver = GoldenSectionMode::new(bracket, opts.rel_tol)?;
    debug!(
        "golden-section search on [{}, {}] (rel_tol = {}, max_iter = {})",
        bracket.lower, bracket.upper, opts.rel_tol, opts.max_iter
    );

    let mut executor = Executor::new(problem, solver);
    executor = executor.configure(|state| state.max_iters(opts.max_iter as u64));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(observer, ObserverMode::Always);
    }

    let result = executor.run()?;
    let state = result.state();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let mode = state.get_param().copied();
    let density = -state.get_cost();
    ModeOutcome::new(mode, density, bracket, termination, iterations, fn_evals, opts.max_iter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        optimization::{
            errors::ModeError,
            mode_optimizer::traits::{CellProblem, FnDensity, Strata},
        },
        priors::{CellPriors, Prior},
    };
    use approx::assert_abs_diff_eq;

    fn cell(n_mno: u64, n_reg: u64) -> CellProblem {
        let prior = Prior::Uniform { x_min: 0.0, x_max: 1.0 };
        CellProblem::new(n_mno, n_reg, CellPriors::new(prior, prior, prior))
    }

    #[test]
    // Purpose
    // -------
    // The executor runs to convergence on a concave synthetic density and
    // counts one batched evaluation at init plus one per iteration.
    //
    // Given
    // -----
    // - Counts (20, 20), density −(x − 20)², default options.
    //
    // Expect
    // ------
    // - Converged, |mode − 20| < 1e-4.
    // - `cost_count == iterations + 1`.
    fn run_converges_and_counts_evaluations() {
        // Arrange
        let evaluator = FnDensity::new(|x: f64, _: &CellProblem| -(x - 20.0).powi(2));
        let cell = cell(20, 20);
        let opts = ModeOptions::default();
        let settings = opts.eval_settings();
        let problem = DensityAdapter::new(&evaluator, &cell, &settings);

        // Act
        let outcome =
            run_golden_section(cell.bracket(), &opts, problem).expect("search should converge");

        // Assert
        assert!(outcome.converged);
        assert_abs_diff_eq!(outcome.mode, 20.0, epsilon = 1e-4);
        assert_eq!(outcome.fn_evals.get("cost_count").copied(), Some(outcome.iterations as u64 + 1));
    }

    #[test]
    // Purpose
    // -------
    // A tight iteration budget surfaces as `IterationLimitReached` with the
    // best point inside the bracket.
    fn run_reports_iteration_limit() {
        let evaluator = FnDensity::new(|x: f64, _: &CellProblem| -(x - 20.0).powi(2));
        let cell = cell(20, 20);
        let opts = ModeOptions::new(1e-6, 100, Strata::default(), false, Some(1), 3)
            .expect("options should be valid");
        let settings = opts.eval_settings();
        let problem = DensityAdapter::new(&evaluator, &cell, &settings);

        match run_golden_section(cell.bracket(), &opts, problem) {
            Err(ModeError::IterationLimitReached { max_iter, best }) => {
                assert_eq!(max_iter, 3);
                assert!(cell.bracket().contains(best));
            }
            other => panic!("expected IterationLimitReached, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // A non-finite density aborts the run with `NonFiniteDensity`.
    fn run_propagates_non_finite_density() {
        let evaluator = FnDensity::new(|x: f64, _: &CellProblem| if x > 12.0 { f64::NAN } else { x });
        let cell = cell(20, 20);
        let opts = ModeOptions::default();
        let settings = opts.eval_settings();
        let problem = DensityAdapter::new(&evaluator, &cell, &settings);

        let err = run_golden_section(cell.bracket(), &opts, problem).unwrap_err();

        assert!(matches!(err, ModeError::NonFiniteDensity { .. }), "got {err:?}");
    }
}
