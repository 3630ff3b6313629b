use num_traits::Float;
use crate::solver::{LinAlg, Operator, SolverError, ProjStat};
use crate::solver::{GridKernel, Schedule, Step, Phase};
use crate::{GridFloat, DevBuf, Layout, BandProj, Scales, NewtonParam};

//

/// Grid-shared memory of a kernel launch
///
/// Views of a work slice of cells:
/// `[y 11n | buff_y 11n | out 11n | w 9n | buff_w 9n | ys 9n | cmd 4]`.
/// `w` and `ys` carry the warm-start state over launches.
#[derive(Debug)]
pub struct GridMem<'a, F: GridFloat>
{
    /// Primal vector.
    pub y: DevBuf<'a, F>,
    /// Affine candidate of the primal vector.
    pub buff_y: DevBuf<'a, F>,
    /// Passthrough output.
    pub out: DevBuf<'a, F>,
    /// Dual state.
    pub w: DevBuf<'a, F>,
    /// Dual residual.
    pub buff_w: DevBuf<'a, F>,
    /// Dual accumulator.
    pub ys: DevBuf<'a, F>,
    /// Command: node-0 control vector and \\(\sigma\\).
    pub cmd: DevBuf<'a, F>,
}

impl<'a, F: GridFloat> Clone for GridMem<'a, F>
{
    fn clone(&self) -> Self
    {
        *self
    }
}

impl<'a, F: GridFloat> Copy for GridMem<'a, F> {}

impl<'a, F: GridFloat> GridMem<'a, F>
{
    /// Length of the command buffer.
    pub const CMD_LEN: usize = 4;

    /// Query of a length of work slice.
    ///
    /// Returns a length of work slice that [`GridMem::from_work`] requires.
    /// * `n` is a number of nodes.
    pub fn query_worklen(n: usize) -> usize
    {
        let layout = Layout::new(n);

        layout.primal_len() * 3 +
        layout.dual_len() * 3 +
        Self::CMD_LEN
    }

    /// Creates views of a work slice.
    ///
    /// Returns [`GridMem`] instance, or `Err` with [`SolverError::WorkShortage`] if `work` is too short.
    /// * `n` is a number of nodes.
    /// * `work` is a slice of cells.
    pub fn from_work(n: usize, work: &'a [F::Cell]) -> Result<Self, SolverError>
    {
        if work.len() < Self::query_worklen(n) {
            log::error!("Work memory length {} must be >= {}", work.len(), Self::query_worklen(n));
            return Err(SolverError::WorkShortage);
        }

        Ok(Self::new(n, work))
    }

    /// Creates views of a work slice, whose length shall be at least [`GridMem::query_worklen`].
    pub fn new(n: usize, work: &'a [F::Cell]) -> Self
    {
        assert!(work.len() >= Self::query_worklen(n));

        let layout = Layout::new(n);
        let (np, nd) = (layout.primal_len(), layout.dual_len());

        let work = DevBuf::new(work);
        let (y, work) = work.split(np);
        let (buff_y, work) = work.split(np);
        let (out, work) = work.split(np);
        let (w, work) = work.split(nd);
        let (buff_w, work) = work.split(nd);
        let (ys, work) = work.split(nd);
        let (cmd, _) = work.split(Self::CMD_LEN);

        GridMem {
            y, buff_y, out, w, buff_w, ys, cmd,
        }
    }
}

//

/// Read-only arguments of a kernel launch.
pub struct KernelArgs<'a, F: GridFloat, O: Operator<F>>
{
    /// Number of nodes.
    pub n: usize,
    /// Fixed offset of the affine step, length `11n`.
    pub prior: &'a [F],
    /// Consensus operator of `11n` rows and `9n` columns.
    pub op: O,
    /// Lower bounds of \\(z\\), length `n + 1`.
    pub z_lb: &'a [F],
    /// Upper bounds of \\(z\\), length `n + 1`.
    pub z_ub: &'a [F],
    /// Problem scales.
    pub scales: Scales<F>,
    /// Number of ADMM iterations.
    pub admm_iter: usize,
    /// Parameters of the Newton-Raphson root-finder.
    pub newton: NewtonParam<F>,
    /// Period of iterations to output progress log.
    pub log_period: usize,
}

//

/// ADMM guidance kernel
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// One worker per primal coordinate. An iteration consists of
/// \\[
/// \begin{array}{l}
/// r \leftarrow w - y_s \\\\
/// \hat{y} \leftarrow q + \tilde{C} r \\\\
/// w \leftarrow \Pi(p(\hat{y}) + y_s),\ y_s \leftarrow y_s + p(\hat{y}) - w \\\\
/// y \leftarrow \hat{y}
/// \end{array}
/// \\]
/// where \\(q\\) is the prior and \\(p(\cdot)\\) is the primal value of each constraint band.
/// Each phase writes each coordinate from exactly one worker.
pub struct AdmmKernel<'a, L, O>
where L: LinAlg, L::F: GridFloat, O: Operator<L::F>
{
    layout: Layout,
    mem: GridMem<'a, L::F>,
    prior: &'a [L::F],
    op: O,
    z_lb: &'a [L::F],
    z_ub: &'a [L::F],
    band: BandProj<L>,
    admm_iter: usize,
    log_period: usize,
}

impl<'a, L, O> AdmmKernel<'a, L, O>
where L: LinAlg, L::F: GridFloat, O: Operator<L::F>
{
    /// Creates an instance.
    ///
    /// Returns [`AdmmKernel`] instance.
    /// Lengths of the arguments shall have been checked by the caller.
    /// * `mem` is the grid-shared memory.
    /// * `args` is the read-only arguments.
    pub fn new(mem: GridMem<'a, L::F>, args: KernelArgs<'a, L::F, O>) -> Self
    {
        AdmmKernel {
            layout: Layout::new(args.n),
            mem,
            prior: args.prior,
            op: args.op,
            z_lb: args.z_lb,
            z_ub: args.z_ub,
            band: BandProj::new(&args.scales, args.newton),
            admm_iter: args.admm_iter,
            log_period: args.log_period,
        }
    }

    fn extract(&self, src: DevBuf<'_, L::F>) -> Result<(), SolverError>
    {
        let u = self.layout.control(0);
        let cmd = self.mem.cmd;

        for i in 0.. 3 {
            cmd.set(i, src.get(u + i));
        }
        cmd.set(3, src.get(self.layout.sigma(0)));

        for i in 0.. GridMem::<L::F>::CMD_LEN {
            if !cmd.get(i).is_finite() {
                log::error!("Non-finite command {:?}", [cmd.get(0), cmd.get(1), cmd.get(2), cmd.get(3)]);
                return Err(SolverError::NonFinite);
            }
        }

        Ok(())
    }

    fn log_progress(&self, iter: usize)
    {
        let log_trig = self.log_period > 0 && iter % self.log_period == 0;

        let y = self.mem.y;
        let u = self.layout.control(0);
        let sigma = self.layout.sigma(0);
        let z = self.layout.z(0);

        if log_trig {
            log::debug!("{}: u {:.3e} {:.3e} {:.3e} sigma {:.3e} z {:.3e}",
                iter, y.get(u), y.get(u + 1), y.get(u + 2), y.get(sigma), y.get(z));
        }
        else {
            log::trace!("{}: u {:.3e} {:.3e} {:.3e} sigma {:.3e} z {:.3e}",
                iter, y.get(u), y.get(u + 1), y.get(u + 2), y.get(sigma), y.get(z));
        }
    }
}

impl<'a, L, O> GridKernel for AdmmKernel<'a, L, O>
where L: LinAlg + Sync, L::F: GridFloat, O: Operator<L::F> + Sync
{
    fn worker_len(&self) -> usize
    {
        self.layout.worker_len()
    }

    fn schedule(&self) -> Schedule
    {
        Schedule::new(self.admm_iter)
    }

    fn run(&self, step: Step, idx: usize) -> Result<ProjStat, SolverError>
    {
        let mem = &self.mem;

        match step.phase {
            Phase::ResidualCompute => {
                if idx == 0 && step.iter > 0 {
                    self.log_progress(step.iter - 1);
                }
                if idx < self.layout.dual_len() {
                    mem.buff_w.set(idx, mem.w.get(idx) - mem.ys.get(idx));
                }
            },
            Phase::AffineUpdate => {
                if idx < self.layout.primal_len() {
                    mem.buff_y.set(idx, self.prior[idx] + self.op.op_row(idx, mem.buff_w));
                }
            },
            Phase::ProjectionDispatch => {
                if let Some((band, node)) = self.layout.band_of(idx) {
                    return self.band.apply(band, node, &self.layout,
                        mem.buff_y, self.z_lb, self.z_ub, mem.w, mem.ys);
                }
            },
            Phase::Commit => {
                if idx < self.layout.primal_len() {
                    let val = mem.buff_y.get(idx);
                    if !val.is_finite() {
                        log::error!("{}: non-finite primal at {}", step.iter, idx);
                        return Err(SolverError::NonFinite);
                    }
                    mem.y.set(idx, val);
                }
            },
            Phase::OutputExtraction => {
                if idx == 0 {
                    if step.iter > 0 {
                        self.log_progress(step.iter - 1);
                    }
                    self.extract(mem.y)?;
                }
            },
            Phase::Passthrough => {
                if idx < self.layout.primal_len() {
                    mem.out.set(idx, mem.buff_y.get(idx));
                }
                if idx == 0 {
                    self.extract(mem.buff_y)?;
                }
            },
        }

        Ok(ProjStat::default())
    }
}

//
