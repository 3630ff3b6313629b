//! Projection onto a constraint set

use crate::solver::{LinAlg, SolverError};

/// Statistics of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjStat
{
    /// `true` if an inner Newton-Raphson solve ran.
    pub newton: bool,
    /// Number of Newton-Raphson steps taken.
    pub newton_iter: usize,
    /// `true` if the Newton-Raphson solve exceeded its step budget without converging.
    pub newton_excess: bool,
}

/// Projection trait
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
pub trait Proj<L: LinAlg>
{
    /// Calculates \\(\Pi_\mathcal{C}(x)\\), that is euclidean projection of \\(x\\) onto the set \\(\mathcal{C}\\).
    /// This is called by the projection phase of [`crate::AdmmKernel`] with passing a band's primal value plus its dual as `x`.
    ///
    /// Returns `Ok` with [`ProjStat`], or `Err` if something fails.
    /// * `x` is \\(x\\), a vector to be projected before entry, and shall be replaced with the projected vector on exit.
    fn proj(&self, x: &mut [L::F]) -> Result<ProjStat, SolverError>;
}
