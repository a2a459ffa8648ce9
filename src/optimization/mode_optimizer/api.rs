//! High-level entry point for the mode of one cell's posterior density.
//!
//! Validates the cell's priors, derives the bracket from its counts,
//! short-circuits zero-width brackets, and otherwise delegates to
//! `run_golden_section` through a `DensityAdapter`.
use log::debug;

use crate::optimization::{
    errors::ModeResult,
    mode_optimizer::{
        adapter::DensityAdapter,
        run::run_golden_section,
        traits::{CellProblem, DensityEvaluator, ModeOptions, ModeOutcome},
    },
};

/// Estimate the mode of λ for a single cell.
///
/// # Behavior
/// - Validates `opts` (`ModeOptions::validate`).
/// - Checks the three priors (`Prior::check`) before any evaluation.
/// - Builds the bracket `[(nMNO + nReg)/4, 3(nMNO + nReg)/4]`.
/// - Zero-width bracket (both counts zero): returns the lower end (`0`)
///   without evaluating the density.
/// - Otherwise runs the golden-section search with `opts`.
///
/// # Errors
/// - Option validation errors (`InvalidRelTol`, `InvalidThreadCount`, ...).
/// - Prior validation errors (`ModeError::InvalidPrior`).
/// - Any error from the search: non-finite densities, evaluator failures,
///   iteration-limit exhaustion.
///
/// # Example
/// ```
/// use lambda_mode::{
///     optimization::mode_optimizer::{estimate_mode, CellProblem, FnDensity, ModeOptions},
///     priors::{CellPriors, Prior},
/// };
///
/// let prior = Prior::Gamma { shape: 2.0, scale: 10.0 };
/// let cell = CellProblem::new(20, 20, CellPriors::new(prior, prior, prior));
/// let density = FnDensity::new(|x: f64, _: &CellProblem| -(x - 20.0).powi(2));
///
/// let outcome = estimate_mode(&density, &cell, &ModeOptions::default())?;
/// assert!((outcome.mode - 20.0).abs() < 1e-4);
/// # Ok::<(), lambda_mode::optimization::errors::ModeError>(())
/// ```
pub fn estimate_mode<D: DensityEvaluator>(
    evaluator: &D, cell: &CellProblem, opts: &ModeOptions,
) -> ModeResult<ModeOutcome> {
    opts.validate()?;
    cell.priors.check()?;
    let bracket = cell.bracket();
    if bracket.is_degenerate() {
        debug!(
            "zero-width bracket for counts ({}, {}); returning {}",
            cell.n_mno, cell.n_reg, bracket.lower
        );
        return Ok(ModeOutcome::degenerate(bracket));
    }
    let settings = opts.eval_settings();
    let problem = DensityAdapter::new(evaluator, cell, &settings);
    run_golden_section(bracket, opts, problem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        optimization::{errors::ModeError, mode_optimizer::traits::FnDensity},
        priors::{CellPriors, Prior},
    };
    use crate::optimization::mode_optimizer::{
        traits::{DensityTable, EvalSettings, Strata},
        types::Candidates,
    };
    use std::{cell::Cell, sync::Mutex};

    /// Evaluator that records what each call received and returns a
    /// quadratic density peaked at 0.4 · (nMNO + nReg).
    #[derive(Default)]
    struct RecordingEvaluator {
        calls: Mutex<Vec<(EvalSettings, CellProblem, usize)>>,
    }

    impl DensityEvaluator for RecordingEvaluator {
        fn evaluate(
            &self, lambdas: &Candidates, cell: &CellProblem, settings: &EvalSettings,
        ) -> ModeResult<DensityTable> {
            self.calls.lock().expect("recorder lock").push((*settings, *cell, lambdas.len()));
            let peak = 0.4 * (cell.n_mno + cell.n_reg) as f64;
            let density = lambdas.mapv(|x| -(x - peak).powi(2));
            Ok(DensityTable::new(lambdas.clone(), density))
        }
    }

    fn priors() -> CellPriors {
        CellPriors::new(
            Prior::Uniform { x_min: 0.0, x_max: 1.0 },
            Prior::Uniform { x_min: 0.0, x_max: 1.0 },
            Prior::Gamma { shape: 2.0, scale: 20.0 },
        )
    }

    #[test]
    // Purpose
    // -------
    // Zero counts return 0 without a single density evaluation.
    fn zero_counts_skip_the_search() {
        // Arrange
        let calls = Cell::new(0usize);
        let evaluator = FnDensity::new(|x: f64, _: &CellProblem| {
            calls.set(calls.get() + 1);
            x
        });
        let cell = CellProblem::new(0, 0, priors());

        // Act
        let outcome =
            estimate_mode(&evaluator, &cell, &ModeOptions::default()).expect("no search needed");

        // Assert
        assert_eq!(outcome.mode, 0.0);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    // Purpose
    // -------
    // Invalid priors are rejected before the evaluator is touched.
    fn invalid_priors_fail_before_evaluation() {
        let calls = Cell::new(0usize);
        let evaluator = FnDensity::new(|x: f64, _: &CellProblem| {
            calls.set(calls.get() + 1);
            x
        });
        let mut bad = priors();
        bad.lambda = Prior::Gamma { shape: 0.0, scale: 1.0 };
        let cell = CellProblem::new(20, 20, bad);

        let err = estimate_mode(&evaluator, &cell, &ModeOptions::default()).unwrap_err();

        assert!(matches!(err, ModeError::InvalidPrior { family: "gamma", .. }), "got {err:?}");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    // Purpose
    // -------
    // A positive, peaked density converges through the relative criterion
    // well before the width criterion would.
    //
    // Given
    // -----
    // - Counts (40, 40), bracket [20, 60], Gaussian-shaped density at 33.
    //
    // Expect
    // ------
    // - Mode within 1e-2 of 33 and inside the bracket.
    fn positive_density_converges_near_peak() {
        let evaluator =
            FnDensity::new(|x: f64, _: &CellProblem| (-(x - 33.0).powi(2) / 50.0).exp());
        let cell = CellProblem::new(40, 40, priors());

        let outcome =
            estimate_mode(&evaluator, &cell, &ModeOptions::default()).expect("should converge");

        assert!(outcome.converged);
        assert!(outcome.bracket.contains(outcome.mode));
        assert!((outcome.mode - 33.0).abs() < 1e-2, "mode = {}", outcome.mode);
    }

    #[test]
    // Purpose
    // -------
    // Every evaluator call during a real search sees the caller's options and
    // the cell's own counts and priors, unchanged.
    //
    // Given
    // -----
    // - Non-default `rel_tol`, `n_sim`, `n_strata`, `verbose`, `n_threads`.
    // - Counts (30, 50) with a triangular `u` prior.
    //
    // Expect
    // ------
    // - One four-point call, then single-point calls only.
    // - Each call carries exactly the projected settings and the cell.
    fn evaluator_receives_options_and_cell_on_every_call() {
        // Arrange
        let opts = ModeOptions::new(1e-5, 2_500, Strata([3, 40]), true, Some(2), 200)
            .expect("options should be valid");
        let mut cell_priors = priors();
        cell_priors.u = Prior::Triangular { x_min: 0.1, x_max: 0.9, x_mode: 0.3 };
        let cell = CellProblem::new(30, 50, cell_priors);
        let evaluator = RecordingEvaluator::default();
        let expected = EvalSettings {
            rel_tol: 1e-5,
            n_sim: 2_500,
            n_strata: Strata([3, 40]),
            verbose: true,
            n_threads: 2,
        };

        // Act
        let outcome = estimate_mode(&evaluator, &cell, &opts).expect("should converge");

        // Assert
        let calls = evaluator.calls.lock().expect("recorder lock");
        assert_eq!(calls.len(), outcome.iterations + 1);
        assert_eq!(calls[0].2, 4);
        assert!(calls[1..].iter().all(|(_, _, n)| *n == 1));
        for (settings, seen, _) in calls.iter() {
            assert_eq!(*settings, expected);
            assert_eq!(*seen, cell);
        }
    }

    #[test]
    // Purpose
    // -------
    // Options built as a struct literal are checked before any evaluation.
    fn hand_built_options_are_validated() {
        let calls = Cell::new(0usize);
        let evaluator = FnDensity::new(|x: f64, _: &CellProblem| {
            calls.set(calls.get() + 1);
            x
        });
        let cell = CellProblem::new(20, 20, priors());
        let bad_tol = ModeOptions { rel_tol: -1.0, ..ModeOptions::default() };
        let bad_threads = ModeOptions { n_threads: Some(0), ..ModeOptions::default() };

        let tol_err = estimate_mode(&evaluator, &cell, &bad_tol).unwrap_err();
        let threads_err = estimate_mode(&evaluator, &cell, &bad_threads).unwrap_err();

        assert!(matches!(tol_err, ModeError::InvalidRelTol { .. }), "got {tol_err:?}");
        assert!(matches!(threads_err, ModeError::InvalidThreadCount { .. }), "got {threads_err:?}");
        assert_eq!(calls.get(), 0);
    }
}
