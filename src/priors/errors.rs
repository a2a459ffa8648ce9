//! Errors for prior specifications (tag parsing, parameter presence, per-cell
//! slicing, and domain checks delegated to `statrs`).
//!
//! [`PriorError`] is local to the `priors` module; the optimizer surface sees
//! it as the matching [`ModeError`](crate::optimization::errors::ModeError)
//! variant through the `From` conversion defined there.
//!
//! ## Conventions
//! - **Indices are 0-based**.
//! - `family` fields carry the short tag (`"unif"`, `"degen"`, `"triang"`,
//!   `"gamma"`), matching the external representation.

/// Result alias for prior construction, slicing, and validation.
pub type PriorResult<T> = Result<T, PriorError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PriorError {
    /// Tag is not one of the supported families.
    UnknownFamily { name: String },

    /// A parameter the family requires was not supplied.
    MissingParam { family: &'static str, param: &'static str },

    /// A parameter the family does not use was supplied.
    UnexpectedParam { family: &'static str, param: String },

    /// Per-cell vectors of one prior have different lengths.
    LengthMismatch { family: &'static str, param: &'static str, expected: usize, found: usize },

    /// Parameters rejected by the distribution constructor.
    InvalidParams { family: &'static str, reason: String },

    /// Requested cell index lies past the end of a per-cell vector.
    IndexOutOfRange { index: usize, len: usize },
}

impl std::error::Error for PriorError {}

impl std::fmt::Display for PriorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorError::UnknownFamily { name } => {
                write!(f, "Unknown prior family '{name}'")
            }
            PriorError::MissingParam { family, param } => {
                write!(f, "Prior '{family}' is missing parameter '{param}'")
            }
            PriorError::UnexpectedParam { family, param } => {
                write!(f, "Prior '{family}' does not take parameter '{param}'")
            }
            PriorError::LengthMismatch { family, param, expected, found } => {
                write!(
                    f,
                    "Prior '{family}' parameter '{param}' has length {found}, expected {expected}"
                )
            }
            PriorError::InvalidParams { family, reason } => {
                write!(f, "Invalid '{family}' prior parameters: {reason}")
            }
            PriorError::IndexOutOfRange { index, len } => {
                write!(f, "Cell index {index} out of range for parameter of length {len}")
            }
        }
    }
}
