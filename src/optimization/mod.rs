//! optimization — mode search and the unified error surface.
//!
//! Purpose
//! -------
//! Provide the numerical core of the crate: a golden-section search for the
//! mode of a one-dimensional unnormalized posterior (`mode_optimizer`) and a
//! single error enum (`errors::ModeError`) with a common result alias
//! (`ModeResult<T>`).
//!
//! Conventions
//! -----------
//! - Public entrypoints that can fail return `ModeResult<T>`; callers never
//!   see raw argmin errors or the prior module's local error enum.
//! - Errors are grouped by [`errors::ErrorKind`] into input, numerical and
//!   backend failures.

pub mod errors;
pub mod mode_optimizer;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use lambda_mode::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{ErrorKind, ModeError, ModeResult};
    pub use super::mode_optimizer::prelude::*;
}
