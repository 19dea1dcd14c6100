use std::fmt::{self, Display, Formatter};

use nalgebra::Complex;

use crate::basis::{basis, MAX_ORDER};
use crate::error::{PolynomialError, Result};
use crate::roots::{CompanionMatrixSolver, RootSolver};

/// A single-variable polynomial with a fixed number of coefficients.
///
/// Coefficients are stored with increasing powers of `t`, i.e.
/// `c[0] + c[1] * t + ... + c[N-1] * t^(N-1)` where `N` is the order
/// (number of coefficients, degree + 1). The order is fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Creates a zero polynomial with `order` coefficients.
    pub fn new(order: usize) -> Result<Self> {
        Self::check_order(order)?;
        Ok(Self {
            coefficients: vec![0.0; order],
        })
    }

    /// Creates a polynomial of `order` from explicit coefficients.
    ///
    /// `coefficients.len()` has to match `order`.
    pub fn from_coefficients(order: usize, coefficients: &[f64]) -> Result<Self> {
        Self::check_order(order)?;
        Self::check_count(order, coefficients.len())?;
        Ok(Self {
            coefficients: coefficients.to_vec(),
        })
    }

    fn check_order(order: usize) -> Result<()> {
        if order == 0 || order > MAX_ORDER {
            return Err(PolynomialError::OrderOutOfRange {
                order,
                max: MAX_ORDER,
            });
        }
        Ok(())
    }

    fn check_count(expected: usize, got: usize) -> Result<()> {
        if expected != got {
            return Err(PolynomialError::CoefficientCountMismatch { expected, got });
        }
        Ok(())
    }

    /// Number of coefficients (degree + 1).
    pub fn order(&self) -> usize {
        self.coefficients.len()
    }

    /// Replaces all coefficients. The new slice must have the same order.
    pub fn set_coefficients(&mut self, coefficients: &[f64]) -> Result<()> {
        Self::check_count(self.order(), coefficients.len())?;
        self.coefficients.copy_from_slice(coefficients);
        Ok(())
    }

    /// Coefficients of the `derivative`-th derivative, in the same increasing
    /// power basis and zero-padded at the high-order end.
    ///
    /// # Panics
    ///
    /// Panics if `derivative` exceeds the order.
    pub fn coefficients(&self, derivative: usize) -> Vec<f64> {
        let n = self.order();
        assert!(
            derivative <= n,
            "derivative {derivative} exceeds polynomial order {n}"
        );
        if derivative == 0 {
            return self.coefficients.clone();
        }
        if derivative == n {
            return vec![0.0; n];
        }

        let row = basis().row(derivative);
        let mut result = vec![0.0; n];
        for (i, slot) in result.iter_mut().take(n - derivative).enumerate() {
            let j = i + derivative;
            *slot = self.coefficients[j] * row[j];
        }
        result
    }

    /// Evaluates the polynomial and its derivatives at `t`.
    ///
    /// Fills `out[i]` with the `i`-th derivative for every slot of `out`, so a
    /// 3-slot buffer receives position, velocity and acceleration.
    ///
    /// # Panics
    ///
    /// Panics if `out` has more slots than the polynomial has coefficients.
    pub fn evaluate_into(&self, t: f64, out: &mut [f64]) {
        let n = self.order();
        assert!(
            out.len() <= n,
            "requested {} derivatives from a polynomial of order {n}",
            out.len()
        );
        for (derivative, slot) in out.iter_mut().enumerate() {
            *slot = self.horner(t, derivative);
        }
    }

    /// Allocating form of [`Polynomial::evaluate_into`].
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds the order.
    pub fn evaluate_derivatives(&self, t: f64, count: usize) -> Vec<f64> {
        let mut out = vec![0.0; count];
        self.evaluate_into(t, &mut out);
        out
    }

    /// Evaluates a single derivative at `t`.
    ///
    /// Derivatives at or beyond the order are identically zero.
    pub fn evaluate(&self, t: f64, derivative: usize) -> f64 {
        if derivative >= self.order() {
            return 0.0;
        }
        self.horner(t, derivative)
    }

    // Horner's scheme over one basis row, folding from the highest power down.
    fn horner(&self, t: f64, derivative: usize) -> f64 {
        let row = basis().row(derivative);
        let last = self.order() - 1;
        let mut acc = row[last] * self.coefficients[last];
        for j in (derivative..last).rev() {
            acc = acc * t + row[j] * self.coefficients[j];
        }
        acc
    }

    /// Complex roots of the polynomial itself using the default solver.
    pub fn roots(&self) -> Vec<Complex<f64>> {
        self.roots_with(&CompanionMatrixSolver)
    }

    /// Complex roots of the polynomial itself using `solver`.
    pub fn roots_with<S: RootSolver>(&self, solver: &S) -> Vec<Complex<f64>> {
        solver.roots(&self.coefficients)
    }

    /// Complex roots of the `derivative`-th derivative.
    ///
    /// # Panics
    ///
    /// Panics if `derivative` exceeds the order.
    pub fn derivative_roots<S: RootSolver>(
        &self,
        derivative: usize,
        solver: &S,
    ) -> Vec<Complex<f64>> {
        solver.roots(&self.coefficients(derivative))
    }

    /// Row `derivative` of the basis table scaled with increasing powers of `t`.
    ///
    /// Dotting the result with a coefficient vector of order `n` yields the
    /// `derivative`-th derivative at `t`, which is how linear (in)equality
    /// constraints on the coefficients are formed.
    ///
    /// # Panics
    ///
    /// Panics if `derivative >= n` or `n` exceeds [`MAX_ORDER`].
    pub fn base_coefficients_with_time(n: usize, derivative: usize, t: f64) -> Vec<f64> {
        let mut out = vec![0.0; n];
        Self::base_coefficients_with_time_into(derivative, t, &mut out);
        out
    }

    /// In-place form of [`Polynomial::base_coefficients_with_time`]; the order
    /// is `out.len()`.
    ///
    /// # Panics
    ///
    /// Panics if `derivative >= out.len()` or `out.len()` exceeds [`MAX_ORDER`].
    pub fn base_coefficients_with_time_into(derivative: usize, t: f64, out: &mut [f64]) {
        let n = out.len();
        assert!(
            derivative < n,
            "derivative {derivative} has to be below order {n}"
        );
        assert!(n <= MAX_ORDER, "order {n} exceeds maximum {MAX_ORDER}");

        let row = basis().row(derivative);
        out.fill(0.0);
        // The leading term carries t^0 and is never scaled
        out[derivative] = row[derivative];

        if t.abs() < f64::EPSILON {
            return;
        }

        let mut t_power = t;
        for (slot, &multiplier) in out.iter_mut().zip(row).skip(derivative + 1) {
            *slot = multiplier * t_power;
            t_power *= t;
        }
    }

    // -----------------------------------------------------------------
    //  Segment transforms
    // -----------------------------------------------------------------

    /// Rescales the time axis so the result evaluates as `p(factor * t)`.
    pub fn scale_in_time(&mut self, factor: f64) {
        let mut scale = 1.0;
        for c in &mut self.coefficients {
            *c *= scale;
            scale *= factor;
        }
    }

    /// Adds a constant to the polynomial.
    pub fn offset(&mut self, value: f64) {
        self.coefficients[0] += value;
    }

    /// Returns a copy with `order` coefficients, zero-padded at the high end.
    pub fn with_order(&self, order: usize) -> Result<Self> {
        Self::check_order(order)?;
        if order < self.order() {
            return Err(PolynomialError::OrderReduction {
                from: self.order(),
                to: order,
            });
        }
        let mut coefficients = self.coefficients.clone();
        coefficients.resize(order, 0.0);
        Ok(Self { coefficients })
    }

    /// Product of two polynomials. Fails when the product order exceeds
    /// [`MAX_ORDER`].
    pub fn product(&self, other: &Polynomial) -> Result<Self> {
        let coefficients = convolve(&self.coefficients, &other.coefficients);
        Self::check_order(coefficients.len())?;
        Ok(Self { coefficients })
    }
}

/// Multiplies two coefficient sequences (discrete convolution).
///
/// The result has `a.len() + b.len() - 1` entries, or none if either input
/// is empty.
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut result = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            result[i + j] += x * y;
        }
    }
    result
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "p(t) = {}", self.coefficients[0])?;
        for (power, &c) in self.coefficients.iter().enumerate().skip(1) {
            if c == 0.0 {
                continue;
            }
            let sign = if c.is_sign_negative() { '-' } else { '+' };
            write!(f, " {sign} {}", c.abs())?;
            if power == 1 {
                write!(f, "t")?;
            } else {
                write!(f, "t^{power}")?;
            }
        }
        Ok(())
    }
}
