use std::prelude::v1::*;
use num_traits::Float;
use kaji_core::solver::{LinAlg, SolverError};
use kaji_core::{GridFloat, Layout, MatOp, MatType, Scales};
use crate::Workspace;

//

/// Guidance problem
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Owns the read-only data of [`kaji_core::solver::Solver::solve`] for \\(N\\) nodes:
/// * the prior \\(q \in \mathbb{R}^{11N}\\)
/// * the consensus matrix \\(\tilde{C} \in \mathbb{R}^{11N \times 9N}\\) in row-major, that is `tilde_c[primal][dual]`
/// * bounds \\(z\_{lb}, z\_{ub} \in \mathbb{R}^{N+1}\\)
/// * [`Scales`].
pub struct ProbGuidance<L: LinAlg>
where L::F: GridFloat
{
    n: usize,
    prior: Vec<L::F>,
    tilde_c: Vec<L::F>,
    z_lb: Vec<L::F>,
    z_ub: Vec<L::F>,
    scales: Scales<L::F>,
}

impl<L: LinAlg> ProbGuidance<L>
where L::F: GridFloat
{
    /// Creates an instance.
    ///
    /// Returns [`ProbGuidance`] instance, or `Err` with
    /// [`SolverError::InvalidSize`] if any length mismatches `n`, or
    /// [`SolverError::InvalidScale`] if the scales are invalid, or
    /// [`SolverError::NonFinite`] if the prior or the bounds are non-finite.
    /// * `n` is a number of nodes, positive.
    /// * `prior` is \\(q\\), of length `11n`.
    /// * `tilde_c` is \\(\tilde{C}\\), of length `11n * 9n`.
    /// * `z_lb` and `z_ub` are of length `n + 1`.
    /// * `scales` is the problem scales.
    pub fn new(n: usize,
        prior: Vec<L::F>, tilde_c: Vec<L::F>,
        z_lb: Vec<L::F>, z_ub: Vec<L::F>,
        scales: Scales<L::F>) -> Result<Self, SolverError>
    {
        let layout = Layout::new(n);
        let (np, nd) = (layout.primal_len(), layout.dual_len());

        if n == 0 || prior.len() != np || tilde_c.len() != np * nd || z_lb.len() != n + 1 || z_ub.len() != n + 1 {
            log::error!("Size mismatch: n {}, prior {}, tilde_c {}, z_lb {}, z_ub {}",
                n, prior.len(), tilde_c.len(), z_lb.len(), z_ub.len());
            return Err(SolverError::InvalidSize);
        }

        scales.check()?;

        if prior.iter().chain(&z_lb).chain(&z_ub).any(|v| !v.is_finite()) {
            log::error!("Non-finite prior or bounds");
            return Err(SolverError::NonFinite);
        }

        Ok(ProbGuidance {
            n, prior, tilde_c, z_lb, z_ub, scales,
        })
    }

    /// Number of nodes.
    pub fn n(&self) -> usize
    {
        self.n
    }

    /// Prior to be updated every control cycle.
    pub fn prior_mut(&mut self) -> &mut [L::F]
    {
        &mut self.prior
    }

    /// Bounds of \\(z\\) to be updated every control cycle.
    ///
    /// Returns a tuple of `z_lb` and `z_ub`.
    pub fn bounds_mut(&mut self) -> (&mut [L::F], &mut [L::F])
    {
        (&mut self.z_lb, &mut self.z_ub)
    }

    /// Generates the problem data structures to be fed to [`kaji_core::solver::Solver::solve`].
    ///
    /// Returns a tuple of the node count, the consensus operator, the prior, the bounds, the scales and the work cells,
    /// or `Err` with [`SolverError::InvalidSize`] if `ws` is for another node count.
    /// * `ws` is a [`Workspace`] which keeps the warm-start state.
    #[allow(clippy::type_complexity)]
    pub fn problem<'a>(&'a self, ws: &'a Workspace<L::F>)
    -> Result<(usize, MatOp<'a, L::F>, &'a [L::F], &'a [L::F], &'a [L::F], Scales<L::F>, &'a [<L::F as GridFloat>::Cell]), SolverError>
    {
        if ws.n() != self.n {
            log::error!("Workspace for {} nodes, problem for {}", ws.n(), self.n);
            return Err(SolverError::InvalidSize);
        }

        let layout = Layout::new(self.n);
        let op = MatOp::new(MatType::RowMajor(layout.primal_len(), layout.dual_len()), &self.tilde_c);

        Ok((self.n, op, self.prior.as_slice(), self.z_lb.as_slice(), self.z_ub.as_slice(), self.scales, ws.cells()))
    }
}
