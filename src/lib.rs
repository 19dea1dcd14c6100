//! # segment_polynomial
//!
//! Fixed-order polynomials used as the time segments of a piecewise
//! trajectory generator.
//!
//! This library provides the following modules:
//! - `basis` for the shared table of derivative multipliers.
//! - `polynomial` for coefficient storage, derivative coefficients and evaluation.
//! - `roots` for the pluggable root solver and its companion-matrix default.
//! - `extremum` for locating the min/max of a derivative over an interval.
//! - `error` for the error type shared by all of the above.

pub mod basis;
pub mod error;
pub mod extremum;
pub mod polynomial;
pub mod roots;

// Re-export main items for convenience:
pub use basis::*;
pub use error::*;
pub use extremum::*;
pub use polynomial::*;
pub use roots::*;
