//! Golden-section maximizer for a one-dimensional density, as an argmin
//! `Solver`.
//!
//! Purpose
//! -------
//! Locate the mode of a unimodal (possibly noisy) density inside an initial
//! [`Bracket`] while evaluating the density as few times as possible: four
//! evaluations to start, one per iteration afterwards.
//!
//! Key behaviors
//! -------------
//! - [`SearchState`] holds the four ordered abscissae `x₁ ≤ x₂ ≤ x₃ ≤ x₄`
//!   and their densities. Each step compares the interior densities:
//!   - `f₂ ≥ f₃`: keep `[x₁, x₃]`, new tuple `(x₁, x₁ + (1−φ)(x₃−x₁), x₂, x₃)`,
//!     candidate `x₂` (now third);
//!   - otherwise: keep `[x₂, x₄]`, new tuple `(x₂, x₃, x₂ + φ(x₄−x₂), x₄)`,
//!     candidate `x₃` (now second).
//! - The search stops when either density gap `|f₃−f₂|` or `|f₄−f₁|` is at
//!   most `f(candidate) · rel_tol`, or when either sub-interval `x₃−x₁` or
//!   `x₄−x₂` is narrower than [`ABS_WIDTH_TOL`].
//! - [`GoldenSectionMode`] drives `SearchState` from argmin's executor, which
//!   supplies iteration counting, `max_iters`, and observers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Brackets are nested: every step keeps `x₁` non-decreasing, `x₄`
//!   non-increasing, and shrinks `x₄ − x₁` by a factor `φ`.
//! - The candidate is always an interior point of the current bracket, so
//!   it stays inside the initial bracket.
//! - A degenerate initial bracket is rejected in `init`; callers are
//!   expected to short-circuit it before building the solver.
//! - The relative criterion assumes a non-negative density; for negative
//!   synthetic densities only the width criterion can fire.
use argmin::core::{
    ArgminError, CostFunction, Error, KV, Problem, Solver, TerminationReason, TerminationStatus,
};
use ndarray::{Array1, array};

use crate::optimization::{
    errors::ModeError,
    mode_optimizer::{
        bracket::Bracket,
        types::{ABS_WIDTH_TOL, Candidates, Densities, ModeState, PHI},
    },
};

/// Which end of the bracket an iteration discards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shrink {
    /// `f₂ ≥ f₃`: the maximum lies in `[x₁, x₃]`; drop `(x₃, x₄]`.
    KeepLower,
    /// `f₃ > f₂`: the maximum lies in `[x₂, x₄]`; drop `[x₁, x₂)`.
    KeepUpper,
}

impl Shrink {
    /// Slot of the candidate point in the tuple produced by this step.
    pub fn candidate_slot(&self) -> usize {
        match self {
            Shrink::KeepLower => 2,
            Shrink::KeepUpper => 1,
        }
    }
}

/// Four ordered points and their densities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchState {
    pub x: [f64; 4],
    pub f: [f64; 4],
}

impl SearchState {
    pub fn new(bracket: &Bracket, f: [f64; 4]) -> Self {
        Self { x: bracket.points(), f }
    }

    /// Outer width `x₄ − x₁`.
    pub fn width(&self) -> f64 {
        self.x[3] - self.x[0]
    }

    pub fn direction(&self) -> Shrink {
        if self.f[1] >= self.f[2] { Shrink::KeepLower } else { Shrink::KeepUpper }
    }

    /// New interior point for a step in direction `shrink`.
    pub fn probe(&self, shrink: Shrink) -> f64 {
        match shrink {
            Shrink::KeepLower => self.x[0] + (1.0 - PHI) * (self.x[2] - self.x[0]),
            Shrink::KeepUpper => self.x[1] + PHI * (self.x[3] - self.x[1]),
        }
    }

    /// Apply one step, inserting `probe` with density `f_probe`.
    pub fn shrink(&self, shrink: Shrink, probe: f64, f_probe: f64) -> Self {
        let (x, f) = (self.x, self.f);
        match shrink {
            Shrink::KeepLower => Self {
                x: [x[0], probe, x[1], x[2]],
                f: [f[0], f_probe, f[1], f[2]],
            },
            Shrink::KeepUpper => Self {
                x: [x[1], x[2], probe, x[3]],
                f: [f[1], f[2], f_probe, f[3]],
            },
        }
    }

    /// Candidate point and its density after a step in direction `shrink`.
    pub fn candidate(&self, shrink: Shrink) -> (f64, f64) {
        let slot = shrink.candidate_slot();
        (self.x[slot], self.f[slot])
    }

    /// Better of the two interior points, used before the first step.
    pub fn leading(&self) -> (f64, f64) {
        if self.f[1] >= self.f[2] { (self.x[1], self.f[1]) } else { (self.x[2], self.f[2]) }
    }

    /// Stopping rule evaluated on the tuple produced by a step.
    pub fn converged(&self, shrink: Shrink, rel_tol: f64) -> bool {
        let (_, f_best) = self.candidate(shrink);
        let tol = f_best * rel_tol;
        let f = &self.f;
        let x = &self.x;
        (f[2] - f[1]).abs() <= tol
            || (f[3] - f[0]).abs() <= tol
            || x[2] - x[0] < ABS_WIDTH_TOL
            || x[3] - x[1] < ABS_WIDTH_TOL
    }
}

/// Golden-section mode search over a fixed initial bracket.
#[derive(Debug, Clone)]
pub struct GoldenSectionMode {
    bracket: Bracket,
    rel_tol: f64,
    search: Option<SearchState>,
    converged: bool,
}

impl GoldenSectionMode {
    /// Build a solver for `bracket` with relative density tolerance `rel_tol`.
    ///
    /// # Errors
    /// [`ModeError::DegenerateBracket`] if `bracket` has no interior.
    pub fn new(bracket: Bracket, rel_tol: f64) -> Result<Self, ModeError> {
        if bracket.is_degenerate() {
            return Err(ModeError::DegenerateBracket { lower: bracket.lower, upper: bracket.upper });
        }
        Ok(Self { bracket, rel_tol, search: None, converged: false })
    }
}

impl<O> Solver<O, ModeState> for GoldenSectionMode
where
    O: CostFunction<Param = Candidates, Output = Densities>,
{
    const NAME: &'static str = "Golden-section mode search";

    /// Evaluate all four bracket points in one evaluator call.
    fn init(
        &mut self, problem: &mut Problem<O>, state: ModeState,
    ) -> Result<(ModeState, Option<KV>), Error> {
        if self.bracket.is_degenerate() {
            return Err(ModeError::DegenerateBracket {
                lower: self.bracket.lower,
                upper: self.bracket.upper,
            }
            .into());
        }
        let points = self.bracket.points();
        let values = problem.cost(&Array1::from(points.to_vec()))?;
        let search = SearchState::new(&self.bracket, [values[0], values[1], values[2], values[3]]);
        let (best, f_best) = search.leading();
        self.search = Some(search);
        self.converged = false;
        Ok((state.param(best).cost(-f_best), None))
    }

    /// One golden-section step: a single new evaluation.
    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: ModeState,
    ) -> Result<(ModeState, Option<KV>), Error> {
        let search = self.search.ok_or_else(|| ArgminError::NotInitialized {
            text: "golden-section search state missing; init was not run".to_string(),
        })?;
        let shrink = search.direction();
        let probe = search.probe(shrink);
        let values = problem.cost(&array![probe])?;
        let next = search.shrink(shrink, probe, values[0]);
        let (best, f_best) = next.candidate(shrink);
        self.converged = next.converged(shrink, self.rel_tol);
        self.search = Some(next);
        Ok((state.param(best).cost(-f_best), None))
    }

    fn terminate(&mut self, _state: &ModeState) -> TerminationStatus {
        if self.converged {
            return TerminationStatus::Terminated(TerminationReason::SolverConverged);
        }
        TerminationStatus::NotTerminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests drive `SearchState` directly with synthetic densities:
    // - direction choice and the two update rules,
    // - nested, strictly shrinking brackets,
    // - the stopping rule on both criteria.
    //
    // Executor wiring (evaluation counts, max_iters) is covered in `run`.
    // -------------------------------------------------------------------------

    fn start(bracket: Bracket, f: impl Fn(f64) -> f64) -> SearchState {
        let p = bracket.points();
        SearchState::new(&bracket, [f(p[0]), f(p[1]), f(p[2]), f(p[3])])
    }

    #[test]
    // Purpose
    // -------
    // With the peak left of centre, the step keeps the lower part and the
    // old `x₂` becomes the candidate in slot 3.
    //
    // Given
    // -----
    // - Bracket [10, 30], density −(x − 12)².
    //
    // Expect
    // ------
    // - New tuple (10, 10 + (1−φ)(m − 10), l, m); candidate = old l.
    fn step_keeps_lower_part_when_left_interior_is_higher() {
        // Arrange
        let f = |x: f64| -(x - 12.0).powi(2);
        let state = start(Bracket::golden(10.0, 30.0), f);
        let [a, l, m, _] = state.x;

        // Act
        let shrink = state.direction();
        let probe = state.probe(shrink);
        let next = state.shrink(shrink, probe, f(probe));

        // Assert
        assert_eq!(shrink, Shrink::KeepLower);
        assert_relative_eq!(probe, a + (1.0 - PHI) * (m - a));
        assert_eq!(next.x, [a, probe, l, m]);
        assert_eq!(next.candidate(shrink).0, l);
    }

    #[test]
    // Purpose
    // -------
    // With the peak right of centre, the step keeps the upper part and the
    // old `x₃` becomes the candidate in slot 2.
    fn step_keeps_upper_part_when_right_interior_is_higher() {
        let f = |x: f64| -(x - 28.0).powi(2);
        let state = start(Bracket::golden(10.0, 30.0), f);
        let [_, l, m, b] = state.x;

        let shrink = state.direction();
        let probe = state.probe(shrink);
        let next = state.shrink(shrink, probe, f(probe));

        assert_eq!(shrink, Shrink::KeepUpper);
        assert_relative_eq!(probe, l + PHI * (b - l));
        assert_eq!(next.x, [l, m, probe, b]);
        assert_eq!(next.candidate(shrink).0, m);
    }

    #[test]
    // Purpose
    // -------
    // Brackets are nested and shrink strictly until the stopping rule fires,
    // and the golden spacing is preserved along the way.
    //
    // Given
    // -----
    // - Bracket from counts (20, 20), density −(x − 23.7)².
    //
    // Expect
    // ------
    // - a non-decreasing, b non-increasing, width strictly decreasing.
    // - interior ordering x₁ ≤ x₂ ≤ x₃ ≤ x₄ at every step.
    fn brackets_are_nested_and_strictly_shrinking() {
        // Arrange
        let f = |x: f64| -(x - 23.7).powi(2);
        let mut state = start(Bracket::from_counts(20, 20), f);

        // Act / Assert
        for _ in 0..200 {
            let shrink = state.direction();
            let probe = state.probe(shrink);
            let next = state.shrink(shrink, probe, f(probe));
            assert!(next.x[0] >= state.x[0]);
            assert!(next.x[3] <= state.x[3]);
            assert!(next.width() < state.width());
            assert!(next.x.windows(2).all(|w| w[0] <= w[1]), "unordered tuple {:?}", next.x);
            let converged = next.converged(shrink, 1e-6);
            state = next;
            if converged {
                break;
            }
        }
        assert!(state.width() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // The relative criterion fires once interior densities agree to within
    // `rel_tol` of the candidate's density.
    fn relative_criterion_fires_on_flat_positive_density() {
        let bracket = Bracket::golden(0.0, 10.0);
        let state = SearchState::new(&bracket, [1.0, 2.0, 2.0 + 1e-9, 1.5]);
        assert!(state.converged(Shrink::KeepUpper, 1e-6));
        assert!(!state.converged(Shrink::KeepUpper, 1e-12));
    }

    #[test]
    fn absolute_criterion_fires_on_narrow_bracket() {
        let bracket = Bracket::golden(5.0, 5.0 + 1e-8);
        let state = SearchState::new(&bracket, [-4.0, -1.0, -2.0, -3.0]);
        assert!(state.converged(Shrink::KeepLower, 1e-6));
    }

    #[test]
    fn degenerate_bracket_is_rejected() {
        let err = GoldenSectionMode::new(Bracket::from_counts(0, 0), 1e-6).unwrap_err();
        assert_eq!(err, ModeError::DegenerateBracket { lower: 0.0, upper: 0.0 });
    }
}
