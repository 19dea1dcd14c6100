//! Error types for polynomial segments.

use thiserror::Error;

/// Result type alias using [`PolynomialError`].
pub type Result<T> = std::result::Result<T, PolynomialError>;

/// Errors reported by polynomial construction and extremum search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolynomialError {
    /// Requested order is zero or exceeds the basis table.
    #[error("polynomial order {order} is outside the supported range 1..={max}")]
    OrderOutOfRange {
        /// The rejected order
        order: usize,
        /// Largest supported order
        max: usize,
    },

    /// Coefficient slice length does not match the polynomial order.
    #[error("number of coefficients has to match: expected {expected}, got {got}")]
    CoefficientCountMismatch {
        /// Order of the polynomial
        expected: usize,
        /// Length of the supplied coefficients
        got: usize,
    },

    /// Padding a polynomial to fewer coefficients than it already has.
    #[error("cannot reduce polynomial order from {from} to {to}")]
    OrderReduction {
        /// Current order
        from: usize,
        /// Requested order
        to: usize,
    },

    /// Extremum search interval is reversed or not a number.
    #[error("invalid interval: t1 = {t1} must not be greater than t2 = {t2}")]
    InvalidInterval {
        /// Interval start
        t1: f64,
        /// Interval end
        t2: f64,
    },

    /// No candidate times were supplied to the min/max selection.
    #[error("cannot find extrema of an empty candidate set")]
    NoCandidates,
}
