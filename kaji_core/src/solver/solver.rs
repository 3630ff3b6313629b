//! ADMM guidance solver

use num_traits::Float;
use core::marker::PhantomData;
use crate::solver::{LinAlg, Operator, Grid, Schedule, SolverError};
use crate::{GridFloat, Layout, GridMem, KernelArgs, AdmmKernel, Scales, NewtonParam};

//

/// Solver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParam<F: Float>
{
    /// Number of ADMM iterations, all of which always run. `0` means a passthrough of a single affine step.
    /// Up to [`Schedule::MAX_ITER`].
    pub admm_iter: usize,
    /// Step budget of the Newton-Raphson root-finder.
    pub newton_max_iter: usize,
    /// Tolerance of the Newton-Raphson root-finder.
    pub newton_eps: F,
    /// Max number of workers which can be resident simultaneously. `None` means no limit except [`Grid::capacity`].
    pub max_resident: Option<usize>,
    /// Period of iterations to output progress log(for debug/trace level).
    pub log_period: usize,
}

impl<F: Float> Default for SolverParam<F>
{
    fn default() -> Self
    {
        let ten = F::from(10).unwrap();

        SolverParam {
            admm_iter: 50,
            newton_max_iter: 20,
            newton_eps: ten.powi(-6),
            max_resident: None,
            log_period: 10,
        }
    }
}

//

/// Guidance command: node-0 control vector and throttle proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command<F: Float>
{
    /// 3-axis control vector \\(u\\).
    pub u: [F; 3],
    /// Throttle proxy \\(\sigma\\).
    pub sigma: F,
}

impl<F: Float> Command<F>
{
    /// Raw 4 values, \\(u\\) followed by \\(\sigma\\).
    pub fn as_array(&self) -> [F; 4]
    {
        [self.u[0], self.u[1], self.u[2], self.sigma]
    }
}

/// Report of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport<F: Float>
{
    /// Command extracted at the end of the launch.
    pub cmd: Command<F>,
    /// Number of ADMM iterations run.
    pub iter: usize,
    /// Number of Newton-Raphson solves.
    pub newton_solves: usize,
    /// Number of Newton-Raphson solves which exceeded their step budget.
    /// The last iterate was used in their place.
    pub newton_excess: usize,
    /// Total Newton-Raphson steps of all solves.
    pub newton_steps: usize,
    /// `true` if the launch was a passthrough.
    pub passthrough: bool,
}

//

/// ADMM guidance solver struct.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// This struct abstracts a once-per-control-cycle solver which seeks a primal vector
/// \\(y \in \mathbb{R}^{11N}\\) of \\(N\\) trajectory nodes, each of which holds
/// control \\(u \in \mathbb{R}^3\\), state \\(x \in \mathbb{R}^6\\), \\(\sigma\\) and \\(z\\), subject to
/// * affine consensus \\(y = q + \tilde{C} r\\) folding the dynamics
/// * \\(z\_{lb} \le z \le z\_{ub}\\)
/// * pointing \\(u\_0 \ge a \sigma\\)
/// * thrust cone \\(\\|u\\|\_2 \le t \sigma\\)
/// * \\(\rho\_{lo} e^{-c z'} \le \sigma \le \rho\_{hi} e^{-c z'}\\), where \\(z'\\) is \\(z\\) of the previous node.
///
/// A fixed number of ADMM iterations runs in a single launch of an [`AdmmKernel`] on a [`Grid`],
/// then the command of the first node is extracted.
pub struct Solver<L: LinAlg>
{
    /// solver parameters.
    pub par: SolverParam<L::F>,
    ph_l: PhantomData<L>,
}

impl<L: LinAlg> Solver<L>
{
    /// Query of a length of work slice.
    ///
    /// Returns a length of work slice that [`Solver::solve`] requires.
    /// * `n` is a number of nodes.
    pub fn query_worklen(n: usize) -> usize
    where L::F: GridFloat
    {
        GridMem::<L::F>::query_worklen(n)
    }

    /// Creates an instance.
    ///
    /// Returns [`Solver`] instance.
    pub fn new() -> Self
    {
        Solver {
            par: SolverParam::default(),
            ph_l: PhantomData,
        }
    }

    /// Changes solver parameters.
    ///
    /// Returns [`Solver`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<L::F>)
    {
        f(&mut self.par);
        self
    }
}

impl<L: LinAlg> Default for Solver<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<L> Solver<L>
where L: LinAlg + Sync, L::F: GridFloat
{
    /// Starts to solve.
    ///
    /// Returns `Ok` with [`SolveReport`] or `Err` with [`SolverError`] type.
    /// * `grid` is a [`Grid`] which launches the kernel.
    /// * `n` is a number of nodes \\(N\\).
    /// * `op` is \\(\tilde{C}\\) as a linear [`Operator`] of `11n` rows and `9n` columns.
    /// * `prior` is \\(q\\), the fixed offset of the affine step, of length `11n`.
    /// * `z_lb` and `z_ub` are bounds of \\(z\\), of length `n + 1` each.
    ///   The first elements stand for \\(z\\) before the first node.
    /// * `scales` is the problem scales.
    /// * `work` slice of cells is used for the kernel buffers. [`Solver::solve`] does not rely on dynamic heap allocation.
    ///   Its dual state persists after the solve, which is a warm start of the next solve unless cleared by the caller.
    pub fn solve<G, O>(self, grid: &G,
        (n, op, prior, z_lb, z_ub, scales, work): (usize, O, &[L::F], &[L::F], &[L::F], Scales<L::F>, &[<L::F as GridFloat>::Cell])
    ) -> Result<SolveReport<L::F>, SolverError>
    where G: Grid, O: Operator<L::F> + Sync
    {
        let layout = Layout::new(n);

        if self.par.admm_iter > Schedule::MAX_ITER {
            log::error!("admm_iter {} must be <= {}", self.par.admm_iter, Schedule::MAX_ITER);
            return Err(SolverError::InvalidParam);
        }

        if n == 0 {
            log::error!("Number of nodes must be positive");
            return Err(SolverError::InvalidSize);
        }

        if prior.len() != layout.primal_len() || z_lb.len() != n + 1 || z_ub.len() != n + 1 {
            log::error!("Size mismatch: n {}, prior {}, z_lb {}, z_ub {}", n, prior.len(), z_lb.len(), z_ub.len());
            return Err(SolverError::InvalidSize);
        }

        if op.size() != (layout.primal_len(), layout.dual_len()) {
            log::error!("Size mismatch: op{:?} must be {:?}", op.size(), (layout.primal_len(), layout.dual_len()));
            return Err(SolverError::InvalidOp);
        }

        scales.check()?;

        if prior.iter().chain(z_lb).chain(z_ub).any(|v| !v.is_finite()) {
            log::error!("Non-finite prior or bounds");
            return Err(SolverError::NonFinite);
        }

        let mem = GridMem::from_work(n, work)?;

        let resident = match (self.par.max_resident, grid.capacity()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if let Some(resident) = resident {
            if layout.worker_len() > resident {
                log::error!("Workers {} exceed the resident capacity {}", layout.worker_len(), resident);
                return Err(SolverError::Residency);
            }
        }

        log::debug!("{:?}", self.par);

        let kernel = AdmmKernel::<L, O>::new(mem, KernelArgs {
            n,
            prior,
            op,
            z_lb,
            z_ub,
            scales,
            admm_iter: self.par.admm_iter,
            newton: NewtonParam {
                max_iter: self.par.newton_max_iter,
                eps: self.par.newton_eps,
            },
            log_period: self.par.log_period,
        });

        log::info!("----- Started");
        let stat = grid.launch(&kernel)?;

        if stat.newton_excess > 0 {
            log::warn!("Newton-Raphson exceeded {} steps in {} of {} solves",
                self.par.newton_max_iter, stat.newton_excess, stat.newton_solves);
        }

        let c = mem.cmd;
        let cmd = Command {
            u: [c.get(0), c.get(1), c.get(2)],
            sigma: c.get(3),
        };
        log::debug!("cmd {:?}", cmd.as_array());

        if self.par.admm_iter == 0 {
            log::info!("----- Passthrough");
        }
        else {
            log::info!("----- Finished");
        }

        Ok(SolveReport {
            cmd,
            iter: self.par.admm_iter,
            newton_solves: stat.newton_solves,
            newton_excess: stat.newton_excess,
            newton_steps: stat.newton_steps,
            passthrough: self.par.admm_iter == 0,
        })
    }
}

//

#[cfg(test)]
mod tests
{
    use float_eq::assert_float_eq;
    use crate::{FloatGeneric, MatOp, MatType, SeqGrid};
    use super::*;

    extern crate std;
    use std::vec::Vec;

    type L = FloatGeneric<f64>;

    struct Capped(usize);

    impl Grid for Capped
    {
        fn capacity(&self) -> Option<usize>
        {
            Some(self.0)
        }

        fn launch<K: crate::solver::GridKernel>(&self, kernel: &K) -> Result<crate::solver::LaunchStat, SolverError>
        {
            SeqGrid::default().launch(kernel)
        }
    }

    fn new_work(n: usize) -> Vec<<f64 as GridFloat>::Cell>
    {
        (0.. Solver::<L>::query_worklen(n)).map(|_| f64::new_cell(0.)).collect()
    }

    #[test]
    fn test_solver_feasible()
    {
        let _ = env_logger::builder().is_test(true).try_init();

        let prior = [2., 0.5, 0.5, 0., 0., 0., 0., 0., 0., 3., 1.];
        let c = [0.; 11 * 9];
        let work = new_work(1);

        let rep = Solver::<L>::new().par(|p| {
            p.admm_iter = 10;
            p.log_period = 3;
        }).solve(&SeqGrid::default(), (
            1, MatOp::new(MatType::RowMajor(11, 9), &c), &prior, &[0., 0.], &[0., 2.],
            Scales::from_array([1., 1., 5., 1., 0.5]), &work
        )).unwrap();

        assert!(!rep.passthrough);
        assert_eq!(rep.iter, 10);
        assert_eq!(rep.newton_excess, 0);
        assert_float_eq!(rep.cmd.as_array().as_ref(), [2., 0.5, 0.5, 3.].as_ref(), abs_all <= 1e-12);
    }

    #[test]
    fn test_solver_invalid()
    {
        let prior = [0.; 11];
        let c = [0.; 11 * 9];
        let work = new_work(1);
        let op = MatOp::new(MatType::RowMajor(11, 9), &c);
        let scales = Scales::from_array([1., 1., 5., 1., 0.5]);
        let grid = SeqGrid::default();

        let s = || Solver::<L>::new();

        assert_eq!(s().solve(&grid, (0, op, &prior, &[0.], &[0.], scales, &work)).err(), Some(SolverError::InvalidSize));
        assert_eq!(s().solve(&grid, (1, op, &prior[.. 10], &[0., 0.], &[0., 2.], scales, &work)).err(), Some(SolverError::InvalidSize));
        assert_eq!(s().solve(&grid, (1, op, &prior, &[0.], &[0., 2.], scales, &work)).err(), Some(SolverError::InvalidSize));

        let op_t = MatOp::new(MatType::RowMajor(9, 11), &c);
        assert_eq!(s().solve(&grid, (1, op_t, &prior, &[0., 0.], &[0., 2.], scales, &work)).err(), Some(SolverError::InvalidOp));

        let bad = Scales::from_array([1., 5., 1., 1., 0.5]);
        assert_eq!(s().solve(&grid, (1, op, &prior, &[0., 0.], &[0., 2.], bad, &work)).err(), Some(SolverError::InvalidScale));

        assert_eq!(s().solve(&grid, (1, op, &prior, &[0., 0.], &[0., 2.], scales, &work[.. 10])).err(), Some(SolverError::WorkShortage));

        assert_eq!(s().par(|p| p.max_resident = Some(10)).solve(&grid, (1, op, &prior, &[0., 0.], &[0., 2.], scales, &work)).err(), Some(SolverError::Residency));
        assert_eq!(s().solve(&Capped(10), (1, op, &prior, &[0., 0.], &[0., 2.], scales, &work)).err(), Some(SolverError::Residency));
        assert!(s().solve(&Capped(11), (1, op, &prior, &[0., 0.], &[0., 2.], scales, &work)).is_ok());
    }

    #[test]
    fn test_solver_excess()
    {
        // (sigma, z_lb[0]) = (3, 2) is above the band, sigma > 1 * e^{-2}
        let prior = [0., 0., 0., 0., 0., 0., 0., 0., 0., 3., 1.];
        let c = [0.; 11 * 9];
        let work = new_work(1);

        let rep = Solver::<L>::new().par(|p| {
            p.admm_iter = 2;
            p.newton_max_iter = 1;
            p.newton_eps = 1e-15;
        }).solve(&SeqGrid::default(), (
            1, MatOp::new(MatType::RowMajor(11, 9), &c), &prior, &[2., 0.], &[0., 2.],
            Scales::from_array([1., 0.5, 1., 1., 0.5]), &work
        )).unwrap();

        assert_eq!(rep.newton_solves, 2);
        assert_eq!(rep.newton_excess, 2);
        assert_eq!(rep.newton_steps, 2);
    }

    #[test]
    fn test_solver_nonfinite_input()
    {
        let prior = [2., 0.5, 0.5, 0., 0., 0., 0., 0., 0., 3., 1.];
        let c = [0.; 11 * 9];
        let work = new_work(1);
        let op = MatOp::new(MatType::RowMajor(11, 9), &c);
        let scales = Scales::from_array([1., 1., 5., 1., 0.5]);
        let grid = SeqGrid::default();

        let s = || Solver::<L>::new().par(|p| p.admm_iter = 1);

        assert_eq!(s().solve(&grid, (1, op, &prior, &[0., f64::NAN], &[0., 2.], scales, &work)).err(), Some(SolverError::NonFinite));
        assert_eq!(s().solve(&grid, (1, op, &prior, &[0., 0.], &[f64::INFINITY, 2.], scales, &work)).err(), Some(SolverError::NonFinite));

        let mut prior_nan = prior;
        prior_nan[4] = f64::NAN;
        assert_eq!(s().solve(&grid, (1, op, &prior_nan, &[0., 0.], &[0., 2.], scales, &work)).err(), Some(SolverError::NonFinite));

        // rejected before launch: the warm-start state stays clean
        let mem = GridMem::<f64>::new(1, &work);
        let mut ys = [1.; 9];
        mem.ys.load_into(&mut ys);
        assert_eq!(ys, [0.; 9]);

        assert!(s().solve(&grid, (1, op, &prior, &[0., 0.], &[0., 2.], scales, &work)).is_ok());
    }

    #[test]
    fn test_solver_iter_range()
    {
        let prior = [2., 0.5, 0.5, 0., 0., 0., 0., 0., 0., 3., 1.];
        let c = [0.; 11 * 9];
        let work = new_work(1);
        let op = MatOp::new(MatType::RowMajor(11, 9), &c);
        let scales = Scales::from_array([1., 1., 5., 1., 0.5]);

        let rslt = Solver::<L>::new().par(|p| p.admm_iter = usize::MAX)
            .solve(&SeqGrid::default(), (1, op, &prior, &[0., 0.], &[0., 2.], scales, &work));
        assert_eq!(rslt.err(), Some(SolverError::InvalidParam));
    }
}
