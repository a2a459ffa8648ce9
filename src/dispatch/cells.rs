//! Cell dispatcher — fan the single-cell optimizer out over many cells.
//!
//! Purpose
//! -------
//! Take count vectors and batch-level priors, check every length up front,
//! slice the priors into one [`CellProblem`] per cell, and run
//! [`estimate_mode`] on each, returning modes in input order.
//!
//! Key behaviors
//! -------------
//! - All input validation (options, count lengths, per-cell prior lengths,
//!   prior domains) happens before the first density evaluation.
//! - Cells run in input order by default; with `parallel_cells` they run on
//!   a dedicated rayon pool of `n_threads` workers and are collected back in
//!   input order.
//! - The first failing cell aborts the whole batch; no partial results are
//!   returned.
//! - One cell yields [`Modes::Single`], more yield [`Modes::Cells`].
use log::{debug, warn};
use ndarray::Array1;
use rayon::{ThreadPoolBuilder, prelude::*};

use crate::{
    dispatch::progress::{LogProgress, NoProgress, ProgressReporter},
    optimization::{
        errors::{ModeError, ModeResult},
        mode_optimizer::{CellProblem, DensityEvaluator, ModeOptions, ModeOutcome, estimate_mode},
    },
    priors::PriorSet,
};

/// Paired network (`nMNO`) and register (`nReg`) counts, one entry per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellCounts {
    n_mno: Array1<u64>,
    n_reg: Array1<u64>,
}

impl CellCounts {
    /// # Errors
    /// - [`ModeError::EmptyCells`] if both vectors are empty.
    /// - [`ModeError::CountLengthMismatch`] if their lengths differ.
    pub fn new(n_mno: Array1<u64>, n_reg: Array1<u64>) -> ModeResult<Self> {
        if n_mno.len() != n_reg.len() {
            return Err(ModeError::CountLengthMismatch { n_mno: n_mno.len(), n_reg: n_reg.len() });
        }
        if n_mno.is_empty() {
            return Err(ModeError::EmptyCells);
        }
        Ok(Self { n_mno, n_reg })
    }

    pub fn single(n_mno: u64, n_reg: u64) -> Self {
        Self { n_mno: Array1::from(vec![n_mno]), n_reg: Array1::from(vec![n_reg]) }
    }

    pub fn len(&self) -> usize {
        self.n_mno.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_mno.is_empty()
    }

    pub fn n_mno(&self) -> &Array1<u64> {
        &self.n_mno
    }

    pub fn n_reg(&self) -> &Array1<u64> {
        &self.n_reg
    }
}

/// Modes in input order: a scalar for one cell, a vector otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Modes {
    Single(f64),
    Cells(Array1<f64>),
}

impl Modes {
    pub fn len(&self) -> usize {
        match self {
            Modes::Single(_) => 1,
            Modes::Cells(modes) => modes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Modes::Single(mode) => vec![*mode],
            Modes::Cells(modes) => modes.to_vec(),
        }
    }
}

/// Check lengths and slice the priors into one problem per cell.
///
/// # Errors
/// - [`ModeError::PriorLengthMismatch`] when a per-cell prior parameter
///   does not have one entry per cell.
/// - Prior errors from inconsistent per-cell vectors inside one spec.
pub fn split_cells(counts: &CellCounts, priors: &PriorSet) -> ModeResult<Vec<CellProblem>> {
    let n_cells = counts.len();
    for (prior, spec) in priors.named() {
        if let Some(found) = spec.cell_len()? {
            if found != n_cells {
                return Err(ModeError::PriorLengthMismatch { prior, expected: n_cells, found });
            }
        }
    }
    counts
        .n_mno()
        .iter()
        .zip(counts.n_reg())
        .enumerate()
        .map(|(index, (&n_mno, &n_reg))| Ok(CellProblem::new(n_mno, n_reg, priors.slice(index)?)))
        .collect()
}

/// Run every cell and return the full outcomes in input order.
///
/// # Errors
/// Input errors before any evaluation; otherwise the first cell failure.
pub fn estimate_mode_outcomes<D, P>(
    evaluator: &D, counts: &CellCounts, priors: &PriorSet, opts: &ModeOptions, progress: &P,
) -> ModeResult<Vec<ModeOutcome>>
where
    D: DensityEvaluator + Sync,
    P: ProgressReporter + ?Sized,
{
    opts.validate()?;
    let cells = split_cells(counts, priors)?;
    for cell in &cells {
        cell.priors.check()?;
    }
    let total = cells.len();
    debug!("dispatching {total} cells (parallel = {})", opts.parallel_cells);

    if opts.parallel_cells && total > 1 {
        let pool = ThreadPoolBuilder::new()
            .num_threads(opts.resolved_threads())
            .build()
            .map_err(|err| ModeError::ThreadPoolBuild { text: err.to_string() })?;
        pool.install(|| {
            cells
                .par_iter()
                .enumerate()
                .map(|(index, cell)| optimize_cell(evaluator, index, total, cell, opts, progress))
                .collect()
        })
    } else {
        cells
            .iter()
            .enumerate()
            .map(|(index, cell)| optimize_cell(evaluator, index, total, cell, opts, progress))
            .collect()
    }
}

/// Modes for every cell, reporting through `progress`.
pub fn estimate_modes_with_progress<D, P>(
    evaluator: &D, counts: &CellCounts, priors: &PriorSet, opts: &ModeOptions, progress: &P,
) -> ModeResult<Modes>
where
    D: DensityEvaluator + Sync,
    P: ProgressReporter + ?Sized,
{
    let outcomes = estimate_mode_outcomes(evaluator, counts, priors, opts, progress)?;
    match outcomes.as_slice() {
        [single] => Ok(Modes::Single(single.mode)),
        many => Ok(Modes::Cells(many.iter().map(|outcome| outcome.mode).collect())),
    }
}

/// Modes for every cell; progress goes to `log` when `opts.verbose` is set.
///
/// # Example
/// ```
/// use lambda_mode::{
///     dispatch::{estimate_modes, CellCounts},
///     optimization::mode_optimizer::{CellProblem, FnDensity, ModeOptions},
///     priors::{Prior, PriorSet, PriorSpec},
/// };
/// use ndarray::array;
///
/// let counts = CellCounts::new(array![20, 17, 25], array![115, 123, 119])?;
/// let uv = PriorSpec::from(Prior::Uniform { x_min: 0.0, x_max: 1.0 });
/// let lambda = PriorSpec::from(Prior::Gamma { shape: 2.0, scale: 50.0 });
/// let priors = PriorSet::new(uv.clone(), uv, lambda);
/// let density = FnDensity::new(|x: f64, cell: &CellProblem| {
///     let peak = 0.4 * (cell.n_mno + cell.n_reg) as f64;
///     -(x - peak).powi(2)
/// });
///
/// let modes = estimate_modes(&density, &counts, &priors, &ModeOptions::default())?;
/// assert_eq!(modes.len(), 3);
/// # Ok::<(), lambda_mode::optimization::errors::ModeError>(())
/// ```
pub fn estimate_modes<D>(
    evaluator: &D, counts: &CellCounts, priors: &PriorSet, opts: &ModeOptions,
) -> ModeResult<Modes>
where
    D: DensityEvaluator + Sync,
{
    if opts.verbose {
        estimate_modes_with_progress(evaluator, counts, priors, opts, &LogProgress)
    } else {
        estimate_modes_with_progress(evaluator, counts, priors, opts, &NoProgress)
    }
}

// ---- Helper Methods ----

fn optimize_cell<D, P>(
    evaluator: &D, index: usize, total: usize, cell: &CellProblem, opts: &ModeOptions,
    progress: &P,
) -> ModeResult<ModeOutcome>
where
    D: DensityEvaluator,
    P: ProgressReporter + ?Sized,
{
    debug!("cell {index}: nMNO = {}, nReg = {}", cell.n_mno, cell.n_reg);
    progress.cell_started(index, total);
    let outcome = estimate_mode(evaluator, cell, opts).inspect_err(|err| {
        warn!("cell {index} (nMNO = {}, nReg = {}) failed: {err}", cell.n_mno, cell.n_reg);
    })?;
    progress.cell_finished(index, total, &outcome);
    Ok(outcome)
}
