//! Polynomial root finding.
//!
//! Root computation sits behind the [`RootSolver`] trait so the numerical
//! method can be swapped without touching [`crate::Polynomial`]. The default
//! [`CompanionMatrixSolver`] takes the eigenvalues of the companion matrix.

use nalgebra::linalg::Schur;
use nalgebra::{Complex, DMatrix};

/// Finds all complex roots of a real polynomial.
///
/// Coefficients use the crate-wide convention, index `i` holds the
/// coefficient of `t^i`. Implementations return a best-effort result and must
/// be free of shared mutable state so they can run from several threads.
pub trait RootSolver {
    /// Returns every root; fewer than the nominal degree if the leading
    /// coefficients vanish.
    fn roots(&self, coefficients: &[f64]) -> Vec<Complex<f64>>;
}

impl<F> RootSolver for F
where
    F: Fn(&[f64]) -> Vec<Complex<f64>>,
{
    fn roots(&self, coefficients: &[f64]) -> Vec<Complex<f64>> {
        self(coefficients)
    }
}

/// Roots as eigenvalues of the companion matrix.
///
/// For the monic polynomial `a_0 + a_1 t + ... + a_{n-1} t^{n-1} + t^n` the
/// companion matrix is
///
/// ```text
/// C = [ 0   0   ...  0  -a_0     ]
///     [ 1   0   ...  0  -a_1     ]
///     [ 0   1   ...  0  -a_2     ]
///     [ .   .   ...  .   .       ]
///     [ 0   0   ...  1  -a_{n-1} ]
/// ```
///
/// Exact-zero high-order coefficients are dropped first, so a cubic with a
/// vanishing `t^3` term is solved as a quadratic. Exact-zero low-order
/// coefficients factor out `t^k` and are reported as `k` exact roots at zero.
/// The eigen-decomposition runs with a bounded number of iterations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompanionMatrixSolver;

impl CompanionMatrixSolver {
    /// Schur iterations allowed per eigenvalue before giving up.
    const ITERATIONS_PER_ROOT: usize = 100;

    // Eigenvalues of the companion matrix of `coefficients`, whose first and
    // last entries are nonzero and whose degree is at least 2.
    fn companion_roots(coefficients: &[f64]) -> Vec<Complex<f64>> {
        let degree = coefficients.len() - 1;
        let leading = coefficients[degree];

        let mut companion = DMatrix::<f64>::zeros(degree, degree);
        for i in 1..degree {
            companion[(i, i - 1)] = 1.0;
        }
        for (i, &c) in coefficients[..degree].iter().enumerate() {
            companion[(i, degree - 1)] = -c / leading;
        }

        let max_niter = Self::ITERATIONS_PER_ROOT * degree;
        // The transpose has the same eigenvalues but a different Hessenberg form
        let schur = Schur::try_new(companion.clone(), f64::EPSILON, max_niter).or_else(|| {
            log::debug!(
                "companion Schur form stalled after {max_niter} iterations, retrying on the transpose"
            );
            Schur::try_new(companion.transpose(), f64::EPSILON, max_niter)
        });

        match schur {
            Some(schur) => schur.complex_eigenvalues().iter().copied().collect(),
            None => {
                log::warn!(
                    "companion matrix of degree {degree} did not converge, dropping its roots"
                );
                Vec::new()
            }
        }
    }
}

impl RootSolver for CompanionMatrixSolver {
    fn roots(&self, coefficients: &[f64]) -> Vec<Complex<f64>> {
        if coefficients.iter().any(|c| !c.is_finite()) {
            log::warn!("skipping root computation for non-finite coefficients");
            return Vec::new();
        }

        // Effective degree: strip vanishing leading terms
        let len = coefficients
            .iter()
            .rposition(|&c| c != 0.0)
            .map_or(0, |i| i + 1);
        if len <= 1 {
            // Constant or identically zero, nothing to report
            return Vec::new();
        }

        // Vanishing low-order terms are exact roots at zero
        let zeros = coefficients[..len]
            .iter()
            .position(|&c| c != 0.0)
            .unwrap_or(0);
        let mut roots = vec![Complex::new(0.0, 0.0); zeros];

        let reduced = &coefficients[zeros..len];
        match reduced.len() - 1 {
            0 => {}
            1 => roots.push(Complex::new(-reduced[0] / reduced[1], 0.0)),
            _ => roots.extend(Self::companion_roots(reduced)),
        }
        roots
    }
}
