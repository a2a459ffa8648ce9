//! Validation helpers for the mode optimizer.
//!
//! - **Option checks**: [`verify_rel_tol`], [`verify_n_sim`],
//!   [`verify_strata`], [`verify_n_threads`], [`verify_max_iter`].
//! - **Evaluator output**: [`validate_densities`] enforces one finite value
//!   per candidate.
//! - **Solver output**: [`validate_mode`] ensures a finite candidate exists.
use crate::optimization::{
    errors::{ModeError, ModeResult},
    mode_optimizer::types::{Candidates, Densities},
};

/// Relative tolerance must be **finite** and **strictly positive**.
///
/// # Errors
/// [`ModeError::InvalidRelTol`] otherwise.
pub fn verify_rel_tol(tol: f64) -> ModeResult<()> {
    if !tol.is_finite() {
        return Err(ModeError::InvalidRelTol { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(ModeError::InvalidRelTol { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

pub fn verify_n_sim(n_sim: usize) -> ModeResult<()> {
    if n_sim == 0 {
        return Err(ModeError::InvalidSimCount {
            n_sim,
            reason: "Monte Carlo sample count must be greater than zero.",
        });
    }
    Ok(())
}

/// Stratification must have exactly two entries, both positive.
pub fn verify_strata(strata: &[usize]) -> ModeResult<()> {
    if strata.len() != 2 {
        return Err(ModeError::InvalidStrata {
            strata: strata.to_vec(),
            reason: "Stratification must have exactly two entries.",
        });
    }
    if strata.contains(&0) {
        return Err(ModeError::InvalidStrata {
            strata: strata.to_vec(),
            reason: "Strata counts must be greater than zero.",
        });
    }
    Ok(())
}

/// `None` means "all available cores"; an explicit zero is rejected.
pub fn verify_n_threads(n_threads: Option<usize>) -> ModeResult<()> {
    if let Some(n_threads) = n_threads {
        if n_threads == 0 {
            return Err(ModeError::InvalidThreadCount {
                n_threads,
                reason: "Thread count must be greater than zero.",
            });
        }
    }
    Ok(())
}

pub fn verify_max_iter(max_iter: usize) -> ModeResult<()> {
    if max_iter == 0 {
        return Err(ModeError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate evaluator output against the candidates it was asked for.
///
/// Checks:
/// - `densities.len() == lambdas.len()`
/// - every density is finite (`NaN` or `±∞` are rejected)
///
/// Negative values are accepted; an unnormalized density is only required
/// to be comparable.
///
/// # Errors
/// - [`ModeError::DensityLengthMismatch`] on a length mismatch.
/// - [`ModeError::NonFiniteDensity`] with the first offending candidate.
pub fn validate_densities(lambdas: &Candidates, densities: &Densities) -> ModeResult<()> {
    if densities.len() != lambdas.len() {
        return Err(ModeError::DensityLengthMismatch {
            expected: lambdas.len(),
            found: densities.len(),
        });
    }
    for (&lambda, &value) in lambdas.iter().zip(densities.iter()) {
        if !value.is_finite() {
            return Err(ModeError::NonFiniteDensity { lambda, value });
        }
    }
    Ok(())
}

/// Validate and unwrap the solver's final candidate.
///
/// # Errors
/// - [`ModeError::MissingMode`] if no candidate was recorded.
/// - [`ModeError::InvalidMode`] if it is not finite.
pub fn validate_mode(mode: Option<f64>) -> ModeResult<f64> {
    match mode {
        Some(value) if value.is_finite() => Ok(value),
        Some(value) => Err(ModeError::InvalidMode { value }),
        None => Err(ModeError::MissingMode),
    }
}
