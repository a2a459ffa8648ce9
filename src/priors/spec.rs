//! Batch-level prior specifications and per-cell slicing.
//!
//! Purpose
//! -------
//! Hold a prior whose parameters are either shared by every cell or given
//! per cell, and turn it into the scalar [`Prior`] for one cell index.
//!
//! Key behaviors
//! -------------
//! - [`ParamValue`] stores one parameter as `Shared(x)` or `PerCell(xs)`.
//! - [`PriorSpec`] is a tagged union over the four families, each variant
//!   carrying its named parameters; [`PriorSpec::from_named`] builds it from
//!   the external `(tag, name=value, ...)` form.
//! - [`PriorSpec::slice`] is total over families: it keeps the tag and
//!   replaces every parameter by its value at the requested cell.
//! - [`PriorSet`] bundles the `u`, `v` and `λ` specs and slices all three at
//!   once into a [`CellPriors`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Within one spec every `PerCell` vector has the same length; this is
//!   checked by [`PriorSpec::cell_len`], not on construction.
//! - Shared values slice to themselves for any index.
use std::collections::HashMap;

use ndarray::Array1;

use crate::priors::{
    errors::{PriorError, PriorResult},
    family::{Prior, PriorFamily},
};

/// One prior parameter, shared across cells or given per cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Shared(f64),
    PerCell(Array1<f64>),
}

impl ParamValue {
    /// Length of a per-cell vector; `None` for shared values.
    pub fn cell_len(&self) -> Option<usize> {
        match self {
            ParamValue::Shared(_) => None,
            ParamValue::PerCell(values) => Some(values.len()),
        }
    }

    /// Value for cell `index`.
    ///
    /// # Errors
    /// [`PriorError::IndexOutOfRange`] when a per-cell vector is too short.
    pub fn at(&self, index: usize) -> PriorResult<f64> {
        match self {
            ParamValue::Shared(value) => Ok(*value),
            ParamValue::PerCell(values) => values
                .get(index)
                .copied()
                .ok_or(PriorError::IndexOutOfRange { index, len: values.len() }),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Shared(value)
    }
}

impl From<Array1<f64>> for ParamValue {
    fn from(values: Array1<f64>) -> Self {
        ParamValue::PerCell(values)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(values: Vec<f64>) -> Self {
        ParamValue::PerCell(Array1::from(values))
    }
}

/// Batch-level prior: family tag plus possibly per-cell parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorSpec {
    Uniform { x_min: ParamValue, x_max: ParamValue },
    Degenerate { x0: ParamValue },
    Triangular { x_min: ParamValue, x_max: ParamValue, x_mode: ParamValue },
    Gamma { shape: ParamValue, scale: ParamValue },
}

impl PriorSpec {
    pub fn family(&self) -> PriorFamily {
        match self {
            PriorSpec::Uniform { .. } => PriorFamily::Uniform,
            PriorSpec::Degenerate { .. } => PriorFamily::Degenerate,
            PriorSpec::Triangular { .. } => PriorFamily::Triangular,
            PriorSpec::Gamma { .. } => PriorFamily::Gamma,
        }
    }

    /// Parameters paired with their external names, in family order.
    pub fn params(&self) -> Vec<(&'static str, &ParamValue)> {
        match self {
            PriorSpec::Uniform { x_min, x_max } => vec![("xMin", x_min), ("xMax", x_max)],
            PriorSpec::Degenerate { x0 } => vec![("x0", x0)],
            PriorSpec::Triangular { x_min, x_max, x_mode } => {
                vec![("xMin", x_min), ("xMax", x_max), ("xMode", x_mode)]
            }
            PriorSpec::Gamma { shape, scale } => vec![("shape", shape), ("scale", scale)],
        }
    }

    /// Build a spec from a tag and named parameters.
    ///
    /// Names follow the external form (`xMin`, `xMax`, `xMode`, `x0`,
    /// `shape`, `scale`); snake-case spellings (`x_min`, ...) are accepted
    /// too.
    ///
    /// # Errors
    /// - [`PriorError::UnknownFamily`] for an unrecognized tag.
    /// - [`PriorError::MissingParam`] when a required name is absent.
    /// - [`PriorError::UnexpectedParam`] for names the family does not use,
    ///   including duplicates.
    pub fn from_named<S, I>(tag: &str, params: I) -> PriorResult<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, ParamValue)>,
    {
        let family: PriorFamily = tag.parse()?;
        let family_tag = family.tag();
        let mut named: HashMap<&'static str, ParamValue> = HashMap::new();
        for (name, value) in params {
            let raw = name.as_ref();
            let canonical = canonical_param_name(family, raw).ok_or_else(|| {
                PriorError::UnexpectedParam { family: family_tag, param: raw.to_string() }
            })?;
            if named.insert(canonical, value).is_some() {
                return Err(PriorError::UnexpectedParam {
                    family: family_tag,
                    param: raw.to_string(),
                });
            }
        }
        let mut take = |param: &'static str| {
            named.remove(param).ok_or(PriorError::MissingParam { family: family_tag, param })
        };
        let spec = match family {
            PriorFamily::Uniform => {
                PriorSpec::Uniform { x_min: take("xMin")?, x_max: take("xMax")? }
            }
            PriorFamily::Degenerate => PriorSpec::Degenerate { x0: take("x0")? },
            PriorFamily::Triangular => PriorSpec::Triangular {
                x_min: take("xMin")?,
                x_max: take("xMax")?,
                x_mode: take("xMode")?,
            },
            PriorFamily::Gamma => PriorSpec::Gamma { shape: take("shape")?, scale: take("scale")? },
        };
        Ok(spec)
    }

    /// Common length of the per-cell parameters, or `None` if all are shared.
    ///
    /// # Errors
    /// [`PriorError::LengthMismatch`] when two per-cell vectors disagree.
    pub fn cell_len(&self) -> PriorResult<Option<usize>> {
        let mut len: Option<usize> = None;
        for (param, value) in self.params() {
            if let Some(found) = value.cell_len() {
                match len {
                    None => len = Some(found),
                    Some(expected) if expected != found => {
                        return Err(PriorError::LengthMismatch {
                            family: self.family().tag(),
                            param,
                            expected,
                            found,
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(len)
    }

    /// Scalar prior for cell `index`, keeping the family tag.
    ///
    /// # Errors
    /// [`PriorError::IndexOutOfRange`] when a per-cell vector is too short.
    pub fn slice(&self, index: usize) -> PriorResult<Prior> {
        let prior = match self {
            PriorSpec::Uniform { x_min, x_max } => {
                Prior::Uniform { x_min: x_min.at(index)?, x_max: x_max.at(index)? }
            }
            PriorSpec::Degenerate { x0 } => Prior::Degenerate { x0: x0.at(index)? },
            PriorSpec::Triangular { x_min, x_max, x_mode } => Prior::Triangular {
                x_min: x_min.at(index)?,
                x_max: x_max.at(index)?,
                x_mode: x_mode.at(index)?,
            },
            PriorSpec::Gamma { shape, scale } => {
                Prior::Gamma { shape: shape.at(index)?, scale: scale.at(index)? }
            }
        };
        Ok(prior)
    }
}

impl From<Prior> for PriorSpec {
    fn from(prior: Prior) -> Self {
        match prior {
            Prior::Uniform { x_min, x_max } => {
                PriorSpec::Uniform { x_min: x_min.into(), x_max: x_max.into() }
            }
            Prior::Degenerate { x0 } => PriorSpec::Degenerate { x0: x0.into() },
            Prior::Triangular { x_min, x_max, x_mode } => PriorSpec::Triangular {
                x_min: x_min.into(),
                x_max: x_max.into(),
                x_mode: x_mode.into(),
            },
            Prior::Gamma { shape, scale } => {
                PriorSpec::Gamma { shape: shape.into(), scale: scale.into() }
            }
        }
    }
}

/// The three scalar priors used by one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPriors {
    pub u: Prior,
    pub v: Prior,
    pub lambda: Prior,
}

impl CellPriors {
    pub fn new(u: Prior, v: Prior, lambda: Prior) -> Self {
        Self { u, v, lambda }
    }

    /// Run [`Prior::check`] on all three priors.
    pub fn check(&self) -> PriorResult<()> {
        self.u.check()?;
        self.v.check()?;
        self.lambda.check()
    }
}

/// The three batch-level prior specs passed to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorSet {
    pub u: PriorSpec,
    pub v: PriorSpec,
    pub lambda: PriorSpec,
}

impl PriorSet {
    pub fn new(u: PriorSpec, v: PriorSpec, lambda: PriorSpec) -> Self {
        Self { u, v, lambda }
    }

    /// Specs paired with the names used in error messages.
    pub fn named(&self) -> [(&'static str, &PriorSpec); 3] {
        [("u", &self.u), ("v", &self.v), ("lambda", &self.lambda)]
    }

    /// Slice all three specs at cell `index`.
    pub fn slice(&self, index: usize) -> PriorResult<CellPriors> {
        Ok(CellPriors {
            u: self.u.slice(index)?,
            v: self.v.slice(index)?,
            lambda: self.lambda.slice(index)?,
        })
    }
}

impl From<CellPriors> for PriorSet {
    fn from(priors: CellPriors) -> Self {
        Self { u: priors.u.into(), v: priors.v.into(), lambda: priors.lambda.into() }
    }
}

// ---- Helper Methods ----

fn canonical_param_name(family: PriorFamily, raw: &str) -> Option<&'static str> {
    let canonical = match raw {
        "xMin" | "x_min" => "xMin",
        "xMax" | "x_max" => "xMax",
        "xMode" | "x_mode" => "xMode",
        "x0" => "x0",
        "shape" => "shape",
        "scale" => "scale",
        _ => return None,
    };
    family.param_names().contains(&canonical).then_some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Building specs from the external named form.
    // - Per-cell length bookkeeping inside one spec.
    // - Slicing shared and per-cell parameters for every family.
    //
    // They intentionally DO NOT cover:
    // - Domain checks of the sliced priors (see `family`).
    // - Cross-spec length checks against count vectors (see `dispatch`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `from_named` accepts the external names and snake-case aliases.
    //
    // Given
    // -----
    // - A triangular tag with `xMin`, `x_max`, `xMode`.
    //
    // Expect
    // ------
    // - A `Triangular` spec with the supplied values in place.
    fn from_named_accepts_external_and_snake_case_names() {
        // Act
        let spec = PriorSpec::from_named(
            "triang",
            [
                ("xMin", ParamValue::Shared(0.0)),
                ("x_max", ParamValue::Shared(1.0)),
                ("xMode", ParamValue::Shared(0.25)),
            ],
        )
        .expect("triangular spec should build");

        // Assert
        assert_eq!(
            spec,
            PriorSpec::Triangular {
                x_min: ParamValue::Shared(0.0),
                x_max: ParamValue::Shared(1.0),
                x_mode: ParamValue::Shared(0.25),
            }
        );
    }

    #[test]
    // Purpose
    // -------
    // Missing, foreign and duplicated names are all rejected.
    fn from_named_rejects_missing_and_unexpected_names() {
        let missing = PriorSpec::from_named("gamma", [("shape", ParamValue::Shared(2.0))]);
        assert_eq!(missing, Err(PriorError::MissingParam { family: "gamma", param: "scale" }));

        let foreign = PriorSpec::from_named(
            "degen",
            [("x0", ParamValue::Shared(1.0)), ("shape", ParamValue::Shared(1.0))],
        );
        assert_eq!(
            foreign,
            Err(PriorError::UnexpectedParam { family: "degen", param: "shape".to_string() })
        );

        let duplicate = PriorSpec::from_named(
            "unif",
            [
                ("xMin", ParamValue::Shared(0.0)),
                ("x_min", ParamValue::Shared(0.1)),
                ("xMax", ParamValue::Shared(1.0)),
            ],
        );
        assert_eq!(
            duplicate,
            Err(PriorError::UnexpectedParam { family: "unif", param: "x_min".to_string() })
        );
    }

    #[test]
    // Purpose
    // -------
    // `cell_len` reports the shared length of per-cell vectors, ignores
    // shared values, and flags disagreeing vectors.
    fn cell_len_tracks_per_cell_vectors() {
        let shared =
            PriorSpec::Gamma { shape: ParamValue::Shared(2.0), scale: ParamValue::Shared(3.0) };
        assert_eq!(shared.cell_len(), Ok(None));

        let mixed = PriorSpec::Uniform {
            x_min: ParamValue::Shared(0.0),
            x_max: vec![1.0, 2.0, 3.0].into(),
        };
        assert_eq!(mixed.cell_len(), Ok(Some(3)));

        let broken = PriorSpec::Triangular {
            x_min: vec![0.0, 0.0].into(),
            x_max: ParamValue::Shared(1.0),
            x_mode: vec![0.5, 0.5, 0.5].into(),
        };
        assert_eq!(
            broken.cell_len(),
            Err(PriorError::LengthMismatch {
                family: "triang",
                param: "xMode",
                expected: 2,
                found: 3,
            })
        );
    }

    #[test]
    // Purpose
    // -------
    // Slicing keeps the tag, picks per-cell entries and broadcasts shared
    // values.
    //
    // Given
    // -----
    // - A uniform spec with shared `xMin` and per-cell `xMax`.
    //
    // Expect
    // ------
    // - Cell 1 gets `xMin = 0`, `xMax = 20`; index 3 is out of range.
    fn slice_broadcasts_shared_and_indexes_per_cell() {
        // Arrange
        let spec = PriorSpec::Uniform {
            x_min: ParamValue::Shared(0.0),
            x_max: array![10.0, 20.0, 30.0].into(),
        };

        // Act
        let cell = spec.slice(1);
        let past_end = spec.slice(3);

        // Assert
        assert_eq!(cell, Ok(Prior::Uniform { x_min: 0.0, x_max: 20.0 }));
        assert_eq!(past_end, Err(PriorError::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    // Purpose
    // -------
    // A scalar prior lifted into a spec slices back to itself at any index.
    fn scalar_prior_round_trips_through_spec() {
        let prior = Prior::Gamma { shape: 1.5, scale: 40.0 };
        let spec = PriorSpec::from(prior);
        assert_eq!(spec.cell_len(), Ok(None));
        assert_eq!(spec.slice(0), Ok(prior));
        assert_eq!(spec.slice(17), Ok(prior));
    }
}
