//! Newton-Raphson root-finder for the exponential band projection.

use num_traits::Float;
use crate::solver::SolverError;

//

/// Newton-Raphson parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonParam<F: Float>
{
    /// Step budget.
    pub max_iter: usize,
    /// Tolerance of \\(|f(x)|\\) to stop early.
    pub eps: F,
}

impl<F: Float> Default for NewtonParam<F>
{
    fn default() -> Self
    {
        let ten = F::from(10).unwrap();

        NewtonParam {
            max_iter: 20,
            eps: ten.powi(-6),
        }
    }
}

//

/// Outcome of a Newton-Raphson solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonResult<F: Float>
{
    /// Last iterate, the root if `converged`.
    pub x: F,
    /// `true` if \\(|f(x)|\\) fell below the tolerance within the step budget.
    pub converged: bool,
    /// Number of steps taken.
    pub iter: usize,
}

//

/// Stationarity condition of the projection onto \\(\sigma = \rho e^{-c z}\\), and its derivative.
///
/// \\[
/// f(x) = e^{cx}(x-b) - \rho^2 c e^{-cx} + \rho a c, \quad
/// f'(x) = e^{cx}(cx - cb + 1) + \rho^2 c^2 e^{-cx}
/// \\]
fn exp_stationary<F: Float>(x: F, a: F, b: F, rho: F, c: F) -> (F, F)
{
    let f1 = F::one();

    let ecx = (c * x).exp();
    let emcx = (-c * x).exp();
    let rho2 = rho * rho;

    let f = ecx * (x - b) - rho2 * c * emcx + rho * a * c;
    let df = ecx * (c * x - c * b + f1) + rho2 * c * c * emcx;

    (f, df)
}

/// Solves \\(f(x)=0\\) of the exponential band projection by Newton-Raphson, seeded at \\(b\\).
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// f(x) = e^{cx}(x-b) - \rho^2 c e^{-cx} + \rho a c
/// \\]
/// is the stationarity condition of the nearest point to \\((a, b)\\)
/// on the curve \\(\sigma = \rho e^{-c z}\\) in the \\((\sigma, z)\\) plane.
///
/// Returns [`NewtonResult`] which carries the last iterate even if not converged,
/// or `Err` with [`SolverError::NonFinite`] on a non-finite value or a vanishing derivative.
pub fn exp_root<F: Float>(a: F, b: F, rho: F, c: F, par: &NewtonParam<F>) -> Result<NewtonResult<F>, SolverError>
{
    let f0 = F::zero();

    let mut x = b;

    for i in 0.. par.max_iter {
        let (f, df) = exp_stationary(x, a, b, rho, c);

        if !f.is_finite() {
            return Err(SolverError::NonFinite);
        }
        if f.abs() < par.eps {
            return Ok(NewtonResult {
                x, converged: true, iter: i,
            });
        }
        if !df.is_finite() || df == f0 {
            return Err(SolverError::NonFinite);
        }

        x = x - f / df;
    }

    let (f, _) = exp_stationary(x, a, b, rho, c);
    if !f.is_finite() {
        return Err(SolverError::NonFinite);
    }

    Ok(NewtonResult {
        x, converged: f.abs() < par.eps, iter: par.max_iter,
    })
}

//

#[test]
fn test_exp_root1()
{
    use float_eq::assert_float_eq;

    // a=2, b=1, rho=1, c=1 has the root x=0:
    // f(0) = (0 - 1) - 1 + 2 = 0
    let par = NewtonParam::default();
    let r = exp_root(2_f64, 1., 1., 1., &par).unwrap();

    assert!(r.converged);
    assert!(r.iter < par.max_iter);
    assert_float_eq!(r.x, 0., abs <= 1e-6);
}

#[test]
fn test_exp_root_seed()
{
    // already stationary at the seed
    // a = rho e^{-c b} gives f(b) = 0
    let (b, rho, c) = (0.5_f64, 2., 0.3);
    let a = rho * (-c * b).exp();
    let r = exp_root(a, b, rho, c, &NewtonParam::default()).unwrap();

    assert!(r.converged);
    assert_eq!(r.iter, 0);
    assert_eq!(r.x, b);
}

#[test]
fn test_exp_root_excess()
{
    let par = NewtonParam {
        max_iter: 1,
        eps: 1e-12,
    };
    let r = exp_root(2_f64, 1., 1., 1., &par).unwrap();

    assert!(!r.converged);
    assert_eq!(r.iter, 1);
    assert!(r.x.is_finite());
}

#[test]
fn test_exp_root_nonfinite()
{
    let par = NewtonParam::default();

    assert_eq!(exp_root(0_f64, -1., 1., 1000., &par), Err(SolverError::NonFinite));
    assert_eq!(exp_root(f64::NAN, 0., 1., 1., &par), Err(SolverError::NonFinite));
}
