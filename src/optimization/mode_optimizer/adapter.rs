//! Adapter that exposes a user `DensityEvaluator` as an `argmin` problem.
//!
//! The golden-section solver asks for densities at several candidates at
//! once (all four bracket points on the first iteration), so the cost
//! function is vector-valued: `Param = Candidates`, `Output = Densities`.
//! Output is validated here so the solver only ever compares finite values.
use argmin::core::{CostFunction, Error};

use crate::optimization::mode_optimizer::{
    traits::{CellProblem, DensityEvaluator, EvalSettings},
    types::{Candidates, Densities},
    validation::validate_densities,
};

/// Bridges a [`DensityEvaluator`] and one cell to `argmin`'s `CostFunction`.
#[derive(Debug, Clone)]
pub struct DensityAdapter<'a, D: DensityEvaluator> {
    pub evaluator: &'a D,
    pub cell: &'a CellProblem,
    pub settings: &'a EvalSettings,
}

impl<'a, D: DensityEvaluator> DensityAdapter<'a, D> {
    pub fn new(evaluator: &'a D, cell: &'a CellProblem, settings: &'a EvalSettings) -> Self {
        Self { evaluator, cell, settings }
    }
}

impl<'a, D: DensityEvaluator> CostFunction for DensityAdapter<'a, D> {
    type Param = Candidates;
    type Output = Densities;

    /// Evaluate the density at every candidate.
    ///
    /// # Errors
    /// - Propagates any `ModeError` from the evaluator.
    /// - `DensityLengthMismatch` / `NonFiniteDensity` from validation.
    fn cost(&self, lambdas: &Self::Param) -> Result<Self::Output, Error> {
        let table = self.evaluator.evaluate(lambdas, self.cell, self.settings)?;
        validate_densities(lambdas, &table.density)?;
        Ok(table.density)
    }
}
