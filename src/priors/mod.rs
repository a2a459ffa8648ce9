//! priors — tagged prior specifications for `u`, `v` and `λ`.
//!
//! Purpose
//! -------
//! Describe the prior distributions handed to the density evaluator in a
//! strongly typed form: a tag over four families (uniform, degenerate,
//! triangular, gamma) with named parameters that may be shared across cells
//! or given per cell.
//!
//! Key behaviors
//! -------------
//! - [`family`]: the [`PriorFamily`] tag and the scalar per-cell [`Prior`],
//!   with domain checks delegated to `statrs`.
//! - [`spec`]: batch-level [`PriorSpec`] built from [`ParamValue`]s, total
//!   per-cell slicing, and the [`PriorSet`]/[`CellPriors`] triples.
//! - [`errors`]: the module-local [`PriorError`], converted into the crate
//!   error at the optimizer boundary.
//!
//! Conventions
//! -----------
//! - Parameter names follow the external form: `xMin`, `xMax`, `xMode`,
//!   `x0`, `shape`, `scale`.
//! - Gamma priors use `(shape, scale)`.
//! - This module never samples from the priors; sampling is the density
//!   evaluator's business.

pub mod errors;
pub mod family;
pub mod spec;

pub use self::errors::{PriorError, PriorResult};
pub use self::family::{Prior, PriorFamily};
pub use self::spec::{CellPriors, ParamValue, PriorSet, PriorSpec};
