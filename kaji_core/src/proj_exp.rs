use num_traits::Float;
use crate::solver::{Proj, ProjStat, LinAlg, SolverError};
use crate::newton::{self, NewtonParam};

//

/// Two-sided exponential band
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// \mathcal{E} =
/// \left\lbrace (\sigma, z) \in \mathbb{R}^2
/// \ \middle|\ \rho_{lo} e^{-c z} \le \sigma \le \rho_{hi} e^{-c z}
/// \right\rbrace
/// \\]
///
/// `x` is laid out as \\(\sigma\\) followed by \\(z\\).
/// A point below (above) the band is moved onto the lower (upper) curve,
/// whose nearest point is found by [`newton::exp_root`].
pub struct ProjExpBand<L: LinAlg>
{
    c: L::F,
    rho_lo: L::F,
    rho_hi: L::F,
    newton: NewtonParam<L::F>,
}

impl<L: LinAlg> ProjExpBand<L>
{
    /// Creates an instance.
    ///
    /// Returns [`ProjExpBand`] instance.
    /// * `c` is the exponent scale \\(c\\).
    /// * `rho_lo` and `rho_hi` are the coefficients \\(\rho_{lo} \le \rho_{hi}\\).
    /// * `newton` is parameters of the inner root-finder.
    pub fn new(c: L::F, rho_lo: L::F, rho_hi: L::F, newton: NewtonParam<L::F>) -> Self
    {
        ProjExpBand {
            c, rho_lo, rho_hi, newton,
        }
    }
}

impl<L: LinAlg> Proj<L> for ProjExpBand<L>
{
    fn proj(&self, x: &mut [L::F]) -> Result<ProjStat, SolverError>
    {
        assert_eq!(x.len(), 2);

        let c = self.c;
        let v1 = x[0];
        let v2 = x[1];

        let decay = (-c * v2).exp();

        let rho = if v1 < self.rho_lo * decay {
            self.rho_lo
        }
        else if v1 > self.rho_hi * decay {
            self.rho_hi
        }
        else {
            return Ok(ProjStat::default());
        };

        let r = newton::exp_root(v1, v2, rho, c, &self.newton)?;

        x[1] = r.x;
        x[0] = rho * (-c * r.x).exp();

        if !x[0].is_finite() {
            return Err(SolverError::NonFinite);
        }

        Ok(ProjStat {
            newton: true,
            newton_iter: r.iter,
            newton_excess: !r.converged,
        })
    }
}

//
