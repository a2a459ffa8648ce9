//! Prior families and per-cell scalar priors.
//!
//! Purpose
//! -------
//! Represent the four prior families used for the auxiliary variables `u`,
//! `v` and for the rate `λ`, both as a bare tag ([`PriorFamily`]) and as a
//! fully parameterized scalar distribution for one cell ([`Prior`]).
//!
//! Key behaviors
//! -------------
//! - Parse external tags (`"unif"`, `"degen"`, `"triang"`, `"gamma"`) and
//!   their long forms, case-insensitively.
//! - Validate scalar parameters by constructing the matching `statrs`
//!   distribution, so domain rules follow `statrs` exactly.
//!
//! Invariants & assumptions
//! ------------------------
//! - A [`Prior`] is plain data; nothing is validated on construction.
//!   Call [`Prior::check`] (the dispatcher does this for every sliced cell)
//!   before relying on the parameters.
//! - Gamma priors are parameterized by `(shape, scale)`; `statrs` takes a
//!   rate, so `rate = 1 / scale`.
use std::{fmt, str::FromStr};

use statrs::distribution::{Gamma, Triangular, Uniform};

use crate::priors::errors::{PriorError, PriorResult};

/// Distribution tag shared by batch and per-cell priors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorFamily {
    Uniform,
    Degenerate,
    Triangular,
    Gamma,
}

impl PriorFamily {
    /// Short tag used in the external `(tag, name=value, ...)` representation.
    pub fn tag(&self) -> &'static str {
        match self {
            PriorFamily::Uniform => "unif",
            PriorFamily::Degenerate => "degen",
            PriorFamily::Triangular => "triang",
            PriorFamily::Gamma => "gamma",
        }
    }

    /// Parameter names in external order.
    pub fn param_names(&self) -> &'static [&'static str] {
        match self {
            PriorFamily::Uniform => &["xMin", "xMax"],
            PriorFamily::Degenerate => &["x0"],
            PriorFamily::Triangular => &["xMin", "xMax", "xMode"],
            PriorFamily::Gamma => &["shape", "scale"],
        }
    }
}

impl fmt::Display for PriorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PriorFamily {
    type Err = PriorError;

    /// Accepts the short tags and their long names in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unif" | "uniform" => Ok(PriorFamily::Uniform),
            "degen" | "degenerate" => Ok(PriorFamily::Degenerate),
            "triang" | "triangular" => Ok(PriorFamily::Triangular),
            "gamma" => Ok(PriorFamily::Gamma),
            _ => Err(PriorError::UnknownFamily { name: s.to_string() }),
        }
    }
}

/// Scalar prior for a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prior {
    Uniform { x_min: f64, x_max: f64 },
    Degenerate { x0: f64 },
    Triangular { x_min: f64, x_max: f64, x_mode: f64 },
    Gamma { shape: f64, scale: f64 },
}

impl Prior {
    pub fn family(&self) -> PriorFamily {
        match self {
            Prior::Uniform { .. } => PriorFamily::Uniform,
            Prior::Degenerate { .. } => PriorFamily::Degenerate,
            Prior::Triangular { .. } => PriorFamily::Triangular,
            Prior::Gamma { .. } => PriorFamily::Gamma,
        }
    }

    /// Validate the parameters against the family's domain.
    ///
    /// # Errors
    /// [`PriorError::InvalidParams`] carrying the `statrs` message (or our
    /// own for degenerate priors and non-positive gamma scales).
    pub fn check(&self) -> PriorResult<()> {
        let family = self.family().tag();
        let invalid = |reason: String| PriorError::InvalidParams { family, reason };
        match *self {
            Prior::Uniform { x_min, x_max } => {
                Uniform::new(x_min, x_max).map_err(|e| invalid(e.to_string()))?;
            }
            Prior::Degenerate { x0 } => {
                if !x0.is_finite() {
                    return Err(invalid(format!("point mass x0 = {x0} must be finite")));
                }
            }
            Prior::Triangular { x_min, x_max, x_mode } => {
                Triangular::new(x_min, x_max, x_mode).map_err(|e| invalid(e.to_string()))?;
            }
            Prior::Gamma { shape, scale } => {
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(invalid(format!("scale = {scale} must be finite and > 0")));
                }
                Gamma::new(shape, 1.0 / scale).map_err(|e| invalid(e.to_string()))?;
            }
        }
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Tags parse in short and long form regardless of case; unknown tags
    // are rejected with the offending name.
    fn family_parses_short_and_long_tags() {
        assert_eq!("unif".parse::<PriorFamily>(), Ok(PriorFamily::Uniform));
        assert_eq!("Degenerate".parse::<PriorFamily>(), Ok(PriorFamily::Degenerate));
        assert_eq!("TRIANG".parse::<PriorFamily>(), Ok(PriorFamily::Triangular));
        assert_eq!("gamma".parse::<PriorFamily>(), Ok(PriorFamily::Gamma));
        assert_eq!(
            "beta".parse::<PriorFamily>(),
            Err(PriorError::UnknownFamily { name: "beta".to_string() })
        );
    }

    #[test]
    // Purpose
    // -------
    // Valid parameter sets pass `check` for every family.
    fn check_accepts_valid_parameters() {
        let priors = [
            Prior::Uniform { x_min: 0.0, x_max: 1.0 },
            Prior::Degenerate { x0: 0.5 },
            Prior::Triangular { x_min: 0.0, x_max: 1.0, x_mode: 0.3 },
            Prior::Gamma { shape: 2.0, scale: 10.0 },
        ];
        for prior in priors {
            assert!(prior.check().is_ok(), "{prior:?} should be valid");
        }
    }

    #[test]
    // Purpose
    // -------
    // Out-of-domain parameters are rejected with the family tag attached.
    //
    // Given
    // -----
    // - A triangular prior whose mode lies outside [min, max].
    // - A gamma prior with non-positive scale.
    // - A degenerate prior at NaN.
    //
    // Expect
    // ------
    // - `InvalidParams` for each, tagged with the family.
    fn check_rejects_out_of_domain_parameters() {
        let cases = [
            (Prior::Triangular { x_min: 0.0, x_max: 1.0, x_mode: 2.0 }, "triang"),
            (Prior::Gamma { shape: 2.0, scale: 0.0 }, "gamma"),
            (Prior::Gamma { shape: -1.0, scale: 1.0 }, "gamma"),
            (Prior::Degenerate { x0: f64::NAN }, "degen"),
        ];
        for (prior, tag) in cases {
            match prior.check() {
                Err(PriorError::InvalidParams { family, .. }) => assert_eq!(family, tag),
                other => panic!("expected InvalidParams for {prior:?}, got {other:?}"),
            }
        }
    }
}
