use argmin::core::{ArgminError, Error};

use crate::priors::errors::PriorError;

/// Crate-wide result alias for mode estimation.
pub type ModeResult<T> = Result<T, ModeError>;

/// Coarse classification of a [`ModeError`].
///
/// - `Input`: rejected before any density evaluation (counts, priors, options).
/// - `Numerical`: raised while searching (non-finite densities, exhausted
///   iteration budget, degenerate brackets reaching the solver).
/// - `Backend`: argmin or thread-pool failures that are neither of the above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Numerical,
    Backend,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModeError {
    // ---- Cell inputs ----
    /// No cells were supplied.
    EmptyCells,

    /// Network and register count vectors differ in length.
    CountLengthMismatch {
        n_mno: usize,
        n_reg: usize,
    },

    /// A per-cell prior parameter vector does not match the number of cells.
    PriorLengthMismatch {
        prior: &'static str,
        expected: usize,
        found: usize,
    },

    // ---- Priors ----
    /// Distribution tag is not one of unif/degen/triang/gamma.
    UnknownPriorFamily {
        name: String,
    },
    /// A parameter required by the family is absent.
    MissingPriorParam {
        family: &'static str,
        param: &'static str,
    },
    /// A parameter not used by the family was supplied.
    UnexpectedPriorParam {
        family: &'static str,
        param: String,
    },
    /// Per-cell vectors inside a single prior disagree in length.
    InconsistentPriorParam {
        family: &'static str,
        param: &'static str,
        expected: usize,
        found: usize,
    },
    /// Parameters are outside the family's domain.
    InvalidPrior {
        family: &'static str,
        reason: String,
    },
    /// Slicing past the end of a per-cell parameter vector.
    CellIndexOutOfRange {
        index: usize,
        len: usize,
    },

    // ---- ModeOptions ----
    /// Relative tolerance needs to be positive and finite.
    InvalidRelTol {
        tol: f64,
        reason: &'static str,
    },
    /// Monte Carlo sample count needs to be positive.
    InvalidSimCount {
        n_sim: usize,
        reason: &'static str,
    },
    /// Stratification needs exactly two positive entries.
    InvalidStrata {
        strata: Vec<usize>,
        reason: &'static str,
    },
    /// Thread count needs to be positive when given.
    InvalidThreadCount {
        n_threads: usize,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },

    // ---- Density evaluation ----
    /// Density evaluator returned NaN or ±inf.
    NonFiniteDensity {
        lambda: f64,
        value: f64,
    },
    /// Density evaluator returned the wrong number of values.
    DensityLengthMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Search ----
    /// Zero-width (or inverted) bracket reached the golden-section solver.
    DegenerateBracket {
        lower: f64,
        upper: f64,
    },
    /// Iteration budget exhausted before the stopping rule fired.
    IterationLimitReached {
        max_iter: usize,
        best: f64,
    },
    /// Solver finished without a candidate point.
    MissingMode,
    /// Candidate point is not finite.
    InvalidMode {
        value: f64,
    },

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Parallel dispatch ----
    /// rayon thread pool could not be built.
    ThreadPoolBuild {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl ModeError {
    /// Classify the error as input, numerical, or backend failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModeError::EmptyCells
            | ModeError::CountLengthMismatch { .. }
            | ModeError::PriorLengthMismatch { .. }
            | ModeError::UnknownPriorFamily { .. }
            | ModeError::MissingPriorParam { .. }
            | ModeError::UnexpectedPriorParam { .. }
            | ModeError::InconsistentPriorParam { .. }
            | ModeError::InvalidPrior { .. }
            | ModeError::CellIndexOutOfRange { .. }
            | ModeError::InvalidRelTol { .. }
            | ModeError::InvalidSimCount { .. }
            | ModeError::InvalidStrata { .. }
            | ModeError::InvalidThreadCount { .. }
            | ModeError::InvalidMaxIter { .. } => ErrorKind::Input,
            ModeError::NonFiniteDensity { .. }
            | ModeError::DensityLengthMismatch { .. }
            | ModeError::DegenerateBracket { .. }
            | ModeError::IterationLimitReached { .. }
            | ModeError::MissingMode
            | ModeError::InvalidMode { .. } => ErrorKind::Numerical,
            ModeError::InvalidParameter { .. }
            | ModeError::NotImplemented { .. }
            | ModeError::NotInitialized { .. }
            | ModeError::ConditionViolated { .. }
            | ModeError::PotentialBug { .. }
            | ModeError::BackendError { .. }
            | ModeError::ThreadPoolBuild { .. }
            | ModeError::UnknownError => ErrorKind::Backend,
        }
    }
}

impl std::error::Error for ModeError {}

impl std::fmt::Display for ModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Cell inputs ----
            ModeError::EmptyCells => {
                write!(f, "No cells supplied")
            }
            ModeError::CountLengthMismatch { n_mno, n_reg } => {
                write!(f, "Count length mismatch: nMNO has {n_mno} cells, nReg has {n_reg}")
            }
            ModeError::PriorLengthMismatch { prior, expected, found } => {
                write!(
                    f,
                    "Prior '{prior}' has per-cell parameters of length {found}, expected {expected}"
                )
            }

            // ---- Priors ----
            ModeError::UnknownPriorFamily { name } => {
                write!(
                    f,
                    "Unknown prior family '{name}': valid tags are 'unif', 'degen', 'triang', 'gamma'"
                )
            }
            ModeError::MissingPriorParam { family, param } => {
                write!(f, "Prior '{family}' is missing parameter '{param}'")
            }
            ModeError::UnexpectedPriorParam { family, param } => {
                write!(f, "Prior '{family}' does not take parameter '{param}'")
            }
            ModeError::InconsistentPriorParam { family, param, expected, found } => {
                write!(
                    f,
                    "Prior '{family}' parameter '{param}' has length {found}, other parameters have {expected}"
                )
            }
            ModeError::InvalidPrior { family, reason } => {
                write!(f, "Invalid '{family}' prior: {reason}")
            }
            ModeError::CellIndexOutOfRange { index, len } => {
                write!(f, "Cell index {index} out of range for {len} cells")
            }

            // ---- ModeOptions ----
            ModeError::InvalidRelTol { tol, reason } => {
                write!(f, "Invalid relative tolerance {tol}: {reason}")
            }
            ModeError::InvalidSimCount { n_sim, reason } => {
                write!(f, "Invalid Monte Carlo sample count {n_sim}: {reason}")
            }
            ModeError::InvalidStrata { strata, reason } => {
                write!(f, "Invalid stratification {strata:?}: {reason}")
            }
            ModeError::InvalidThreadCount { n_threads, reason } => {
                write!(f, "Invalid thread count {n_threads}: {reason}")
            }
            ModeError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }

            // ---- Density evaluation ----
            ModeError::NonFiniteDensity { lambda, value } => {
                write!(f, "Non-finite density {value} at lambda = {lambda}")
            }
            ModeError::DensityLengthMismatch { expected, found } => {
                write!(f, "Density evaluator returned {found} values for {expected} candidates")
            }

            // ---- Search ----
            ModeError::DegenerateBracket { lower, upper } => {
                write!(f, "Degenerate search bracket [{lower}, {upper}]")
            }
            ModeError::IterationLimitReached { max_iter, best } => {
                write!(
                    f,
                    "Golden-section search did not converge within {max_iter} iterations (best point {best})"
                )
            }
            ModeError::MissingMode => {
                write!(f, "Solver finished without a candidate mode")
            }
            ModeError::InvalidMode { value } => {
                write!(f, "Invalid mode {value}, must be finite")
            }

            // ---- Argmin ----
            ModeError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            ModeError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            ModeError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            ModeError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            ModeError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            ModeError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Parallel dispatch ----
            ModeError::ThreadPoolBuild { text } => {
                write!(f, "Could not build cell thread pool: {text}")
            }

            // ---- Fallback ----
            ModeError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

/// Errors raised inside the density adapter travel through argmin as
/// `anyhow` errors; recover them first, then argmin's own variants.
impl From<Error> for ModeError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<ModeError>() {
            Ok(mode_err) => return mode_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => ModeError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => ModeError::NotImplemented { text },
                ArgminError::NotInitialized { text } => ModeError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => ModeError::ConditionViolated { text },
                ArgminError::PotentialBug { text } => ModeError::PotentialBug { text },
                _ => ModeError::UnknownError,
            },
            Err(err) => ModeError::BackendError { text: err.to_string() },
        }
    }
}

impl From<PriorError> for ModeError {
    fn from(err: PriorError) -> Self {
        match err {
            PriorError::UnknownFamily { name } => ModeError::UnknownPriorFamily { name },
            PriorError::MissingParam { family, param } => {
                ModeError::MissingPriorParam { family, param }
            }
            PriorError::UnexpectedParam { family, param } => {
                ModeError::UnexpectedPriorParam { family, param }
            }
            PriorError::LengthMismatch { family, param, expected, found } => {
                ModeError::InconsistentPriorParam { family, param, expected, found }
            }
            PriorError::InvalidParams { family, reason } => {
                ModeError::InvalidPrior { family, reason }
            }
            PriorError::IndexOutOfRange { index, len } => {
                ModeError::CellIndexOutOfRange { index, len }
            }
        }
    }
}
