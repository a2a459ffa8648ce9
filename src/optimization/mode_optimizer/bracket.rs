//! Initial search bracket derived from a cell's raw counts.
//!
//! The mode of λ scales with total observed activity, so the bracket is
//! `[(nMNO + nReg) / 4, 3 (nMNO + nReg) / 4]` with interior points at the
//! golden-ratio positions. Both counts zero gives a zero-width bracket; the
//! optimizer returns its lower end without searching.
use crate::optimization::mode_optimizer::types::PHI;

/// Four ordered abscissae `lower ≤ inner_lower ≤ inner_upper ≤ upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lower: f64,
    pub inner_lower: f64,
    pub inner_upper: f64,
    pub upper: f64,
}

impl Bracket {
    /// Golden-ratio bracket on `[lower, upper]`.
    pub fn golden(lower: f64, upper: f64) -> Self {
        let width = upper - lower;
        Self {
            lower,
            inner_lower: lower + (1.0 - PHI) * width,
            inner_upper: lower + PHI * width,
            upper,
        }
    }

    /// Bracket for a cell with `n_mno` network and `n_reg` register counts.
    pub fn from_counts(n_mno: u64, n_reg: u64) -> Self {
        let total = n_mno.saturating_add(n_reg) as f64;
        let lower = (total / 4.0).max(0.0);
        let upper = 3.0 * total / 4.0;
        Self::golden(lower, upper)
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// `true` when the bracket has no interior to search (`upper − lower ≤ 0`
    /// or NaN endpoints).
    pub fn is_degenerate(&self) -> bool {
        let width = self.width();
        width.is_nan() || width <= 0.0
    }

    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }

    /// Abscissae in search order.
    pub fn points(&self) -> [f64; 4] {
        [self.lower, self.inner_lower, self.inner_upper, self.upper]
    }
}
