use std::borrow::Cow;

use nalgebra::Complex;

use crate::error::{PolynomialError, Result};
use crate::polynomial::Polynomial;
use crate::roots::{CompanionMatrixSolver, RootSolver};

/// Default tolerance on the imaginary part for a root to count as real.
///
/// Multiple real roots come back from the eigenvalue solver perturbed on the
/// order of the square root of machine precision.
pub const DEFAULT_IMAG_TOLERANCE: f64 = 1.490_116_119_384_765_6e-8;

/// A time and the value a derivative takes there.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extremum {
    pub time: f64,
    pub value: f64,
}

/// Global minimum and maximum of a derivative over an interval.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MinMax {
    pub min: Extremum,
    pub max: Extremum,
}

/// Tunables of the extremum search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtremumSettings {
    /// Largest |imaginary part| of a root still treated as real.
    imag_tolerance: f64,
}

impl Default for ExtremumSettings {
    fn default() -> Self {
        Self {
            imag_tolerance: DEFAULT_IMAG_TOLERANCE,
        }
    }
}

impl ExtremumSettings {
    /// Creates settings with the given imaginary-part tolerance.
    /// Non-finite or non-positive values fall back to [`DEFAULT_IMAG_TOLERANCE`].
    pub fn new(imag_tolerance: f64) -> Self {
        let imag_tolerance = if imag_tolerance.is_finite() && imag_tolerance > 0.0 {
            imag_tolerance
        } else {
            DEFAULT_IMAG_TOLERANCE
        };
        Self { imag_tolerance }
    }

    /// Get the imaginary-part tolerance.
    pub fn imag_tolerance(&self) -> f64 {
        self.imag_tolerance
    }
}

impl Polynomial {
    /// Minimum and maximum of the `derivative`-th derivative on `[t1, t2]`.
    ///
    /// Roots are computed with the [`CompanionMatrixSolver`] and the default
    /// [`ExtremumSettings`].
    pub fn find_min_max(&self, t1: f64, t2: f64, derivative: usize) -> Result<MinMax> {
        self.find_min_max_with(
            t1,
            t2,
            derivative,
            &CompanionMatrixSolver,
            &ExtremumSettings::default(),
        )
    }

    /// Minimum and maximum of the `derivative`-th derivative on `[t1, t2]`
    /// using a caller-chosen root solver.
    pub fn find_min_max_with<S: RootSolver>(
        &self,
        t1: f64,
        t2: f64,
        derivative: usize,
        solver: &S,
        settings: &ExtremumSettings,
    ) -> Result<MinMax> {
        // Critical points of derivative d are the roots of derivative d + 1
        self.search(t1, t2, derivative, settings, || {
            Cow::Owned(self.derivative_roots(derivative + 1, solver))
        })
    }

    /// Minimum and maximum of the `derivative`-th derivative on `[t1, t2]`
    /// from precomputed roots.
    ///
    /// `roots_of_derivative` are the roots of derivative `derivative + 1`,
    /// e.g. from [`Polynomial::derivative_roots`]. Reusing them avoids solving
    /// again when the same segment is searched over several intervals.
    pub fn find_min_max_with_roots(
        &self,
        t1: f64,
        t2: f64,
        derivative: usize,
        roots_of_derivative: &[Complex<f64>],
        settings: &ExtremumSettings,
    ) -> Result<MinMax> {
        self.search(t1, t2, derivative, settings, || {
            Cow::Borrowed(roots_of_derivative)
        })
    }

    // Roots are only resolved once the interval and order checks pass.
    fn search<'r>(
        &self,
        t1: f64,
        t2: f64,
        derivative: usize,
        settings: &ExtremumSettings,
        roots: impl FnOnce() -> Cow<'r, [Complex<f64>]>,
    ) -> Result<MinMax> {
        Self::check_interval(t1, t2)?;
        if derivative >= self.order() {
            return Ok(Self::zero_extremum(t1));
        }

        let roots = roots();
        let candidates = select_candidates_from_roots(t1, t2, &roots, settings.imag_tolerance);
        self.select_min_max_from_candidates(&candidates, derivative)
    }

    /// Evaluates `derivative` at every candidate time and keeps the extremes.
    /// On ties the earliest candidate wins.
    pub fn select_min_max_from_candidates(
        &self,
        candidates: &[f64],
        derivative: usize,
    ) -> Result<MinMax> {
        let (&first, rest) = candidates
            .split_first()
            .ok_or(PolynomialError::NoCandidates)?;

        let start = Extremum {
            time: first,
            value: self.evaluate(first, derivative),
        };
        let mut result = MinMax {
            min: start,
            max: start,
        };

        for &time in rest {
            let value = self.evaluate(time, derivative);
            if value < result.min.value {
                result.min = Extremum { time, value };
            }
            if value > result.max.value {
                result.max = Extremum { time, value };
            }
        }
        Ok(result)
    }

    fn check_interval(t1: f64, t2: f64) -> Result<()> {
        if t1.is_nan() || t2.is_nan() || t1 > t2 {
            log::warn!("rejecting extremum search on [{t1}, {t2}]: t1 is greater than t2");
            return Err(PolynomialError::InvalidInterval { t1, t2 });
        }
        Ok(())
    }

    // Derivatives at or beyond the order vanish everywhere
    fn zero_extremum(t1: f64) -> MinMax {
        let at_start = Extremum {
            time: t1,
            value: 0.0,
        };
        MinMax {
            min: at_start,
            max: at_start,
        }
    }
}

/// Candidate times for an extremum on `[t1, t2]`: both bounds followed by the
/// real parts of every root whose imaginary part is within `imag_tolerance`
/// and whose real part lies inside the interval.
pub fn select_candidates_from_roots(
    t1: f64,
    t2: f64,
    roots: &[Complex<f64>],
    imag_tolerance: f64,
) -> Vec<f64> {
    let mut candidates = Vec::with_capacity(roots.len() + 2);
    candidates.push(t1);
    candidates.push(t2);
    candidates.extend(
        roots
            .iter()
            .filter(|r| r.im.abs() <= imag_tolerance && r.re >= t1 && r.re <= t2)
            .map(|r| r.re),
    );
    log::trace!(
        "{} extremum candidates on [{t1}, {t2}] from {} roots",
        candidates.len(),
        roots.len()
    );
    candidates
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    const EPS: f64 = 1e-9;

    fn cubic() -> Polynomial {
        // t^3
        Polynomial::from_coefficients(4, &[0.0, 0.0, 0.0, 1.0]).unwrap()
    }

    #[test]
    fn settings_sanitize_tolerance() {
        assert_eq!(ExtremumSettings::new(1e-6).imag_tolerance(), 1e-6);
        assert_eq!(
            ExtremumSettings::new(-1.0).imag_tolerance(),
            DEFAULT_IMAG_TOLERANCE
        );
        assert_eq!(
            ExtremumSettings::new(f64::NAN).imag_tolerance(),
            DEFAULT_IMAG_TOLERANCE
        );
        assert_eq!(
            ExtremumSettings::default().imag_tolerance(),
            DEFAULT_IMAG_TOLERANCE
        );
    }

    #[test]
    fn candidates_filter_complex_and_outside_roots() {
        let roots = [
            Complex::new(0.5, 0.0),
            Complex::new(0.2, 1e-12),
            Complex::new(0.3, 0.4),
            Complex::new(1.5, 0.0),
            Complex::new(-0.1, 0.0),
        ];
        let c = select_candidates_from_roots(0.0, 1.0, &roots, 1e-10);
        assert_eq!(c, vec![0.0, 1.0, 0.5, 0.2]);
    }

    #[test]
    fn inflection_is_not_an_extremum() {
        let mm = cubic().find_min_max(-1.0, 1.0, 0).unwrap();
        assert!((mm.min.time + 1.0).abs() < EPS);
        assert!((mm.min.value + 1.0).abs() < EPS);
        assert!((mm.max.time - 1.0).abs() < EPS);
        assert!((mm.max.value - 1.0).abs() < EPS);
    }

    #[test]
    fn interior_maximum() {
        // -(t - 1)^2 + 2 = 1 + 2t - t^2, peak of 2 at t = 1
        let p = Polynomial::from_coefficients(3, &[1.0, 2.0, -1.0]).unwrap();
        let mm = p.find_min_max(0.0, 3.0, 0).unwrap();
        assert!((mm.max.time - 1.0).abs() < EPS);
        assert!((mm.max.value - 2.0).abs() < EPS);
        assert_eq!(mm.min.time, 3.0);
        assert!((mm.min.value + 2.0).abs() < EPS);
    }

    #[test]
    fn extremum_of_velocity() {
        // Velocity of t^3 is 3t^2: minimum 0 at t = 0 inside [-1, 2]
        let mm = cubic().find_min_max(-1.0, 2.0, 1).unwrap();
        assert!(mm.min.time.abs() < 1e-6);
        assert!(mm.min.value.abs() < 1e-10);
        assert_eq!(mm.max.time, 2.0);
        assert!((mm.max.value - 12.0).abs() < EPS);
    }

    #[test]
    fn degenerate_interval() {
        let p = cubic();
        let mm = p.find_min_max(0.7, 0.7, 0).unwrap();
        let v = p.evaluate(0.7, 0);
        assert_eq!(mm.min, Extremum { time: 0.7, value: v });
        assert_eq!(mm.max, Extremum { time: 0.7, value: v });
    }

    #[test]
    fn reversed_interval_is_reported() {
        assert_eq!(
            cubic().find_min_max(1.0, -1.0, 0),
            Err(PolynomialError::InvalidInterval { t1: 1.0, t2: -1.0 })
        );
        assert!(cubic().find_min_max(f64::NAN, 1.0, 0).is_err());
    }

    #[test]
    fn derivative_beyond_order_is_zero() {
        let mm = cubic().find_min_max(-2.0, 5.0, 4).unwrap();
        assert_eq!(mm.min, Extremum { time: -2.0, value: 0.0 });
        assert_eq!(mm.max, Extremum { time: -2.0, value: 0.0 });
    }

    #[test]
    fn constant_derivative() {
        // Third derivative of t^3 is 6 everywhere, no critical points
        let mm = cubic().find_min_max(-1.0, 1.0, 3).unwrap();
        assert_eq!(mm.min.value, 6.0);
        assert_eq!(mm.max.value, 6.0);
        assert_eq!(mm.min.time, -1.0);
        assert_eq!(mm.max.time, -1.0);
    }

    #[test]
    fn precomputed_roots_are_used() {
        let p = Polynomial::from_coefficients(3, &[1.0, 2.0, -1.0]).unwrap();
        let roots = p.derivative_roots(1, &CompanionMatrixSolver);
        let settings = ExtremumSettings::default();
        let direct = p.find_min_max(0.0, 3.0, 0).unwrap();
        let reused = p
            .find_min_max_with_roots(0.0, 3.0, 0, &roots, &settings)
            .unwrap();
        assert_eq!(direct, reused);

        // Without the critical point only the bounds remain
        let bounds_only = p
            .find_min_max_with_roots(0.0, 3.0, 0, &[], &settings)
            .unwrap();
        assert_eq!(bounds_only.max.time, 0.0);
    }

    #[test]
    fn custom_solver() {
        let p = Polynomial::from_coefficients(3, &[1.0, 2.0, -1.0]).unwrap();
        let solver = |_: &[f64]| vec![Complex::new(1.0, 0.0)];
        let mm = p
            .find_min_max_with(0.0, 3.0, 0, &solver, &ExtremumSettings::default())
            .unwrap();
        assert_eq!(mm.max, Extremum { time: 1.0, value: 2.0 });
    }

    #[test]
    fn solver_runs_only_after_checks_pass() {
        let calls = Cell::new(0);
        let solver = |_: &[f64]| {
            calls.set(calls.get() + 1);
            Vec::<Complex<f64>>::new()
        };
        let settings = ExtremumSettings::default();
        let p = cubic();

        assert!(p.find_min_max_with(1.0, 0.0, 0, &solver, &settings).is_err());
        assert!(p.find_min_max_with(0.0, 1.0, 4, &solver, &settings).is_ok());
        assert_eq!(calls.get(), 0);

        assert!(p.find_min_max_with(0.0, 1.0, 0, &solver, &settings).is_ok());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn pure_quartic_minimum_at_origin() {
        // t^4: the velocity 4t^3 has a triple root at zero
        let p = Polynomial::from_coefficients(5, &[0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let mm = p.find_min_max(-1.0, 1.0, 0).unwrap();
        assert!(mm.min.time.abs() < EPS);
        assert_eq!(mm.min.value, 0.0);
        assert_eq!(mm.max.value, 1.0);
    }

    #[test]
    fn ties_keep_first_candidate() {
        let p = Polynomial::from_coefficients(1, &[4.0]).unwrap();
        let mm = p
            .select_min_max_from_candidates(&[3.0, 1.0, 2.0], 0)
            .unwrap();
        assert_eq!(mm.min.time, 3.0);
        assert_eq!(mm.max.time, 3.0);
        assert_eq!(
            p.select_min_max_from_candidates(&[], 0),
            Err(PolynomialError::NoCandidates)
        );
    }
}
