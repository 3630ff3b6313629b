use std::prelude::v1::*;
use kaji_core::solver::SolverError;
use kaji_core::{GridFloat, GridMem, Layout};

//

/// Kernel buffers for a fixed number of nodes.
///
/// Holds every grid-shared buffer of [`kaji_core::solver::Solver::solve`].
/// The dual state and the dual accumulator are not cleared by a solve,
/// so that the next solve starts warm from them; call [`Workspace::reset`] for a fresh solve.
#[derive(Debug)]
pub struct Workspace<F: GridFloat>
{
    n: usize,
    cells: Vec<F::Cell>,
}

impl<F: GridFloat> Workspace<F>
{
    /// Creates an instance with all buffers cleared.
    ///
    /// Returns [`Workspace`] instance.
    /// * `n` is a number of nodes.
    pub fn new(n: usize) -> Self
    {
        let len = GridMem::<F>::query_worklen(n);

        Workspace {
            n,
            cells: (0.. len).map(|_| F::new_cell(F::zero())).collect(),
        }
    }

    /// Number of nodes.
    pub fn n(&self) -> usize
    {
        self.n
    }

    /// Cells to be passed to [`kaji_core::solver::Solver::solve`].
    pub fn cells(&self) -> &[F::Cell]
    {
        &self.cells
    }

    fn mem(&self) -> GridMem<'_, F>
    {
        GridMem::new(self.n, &self.cells)
    }

    /// Clears all buffers including the warm-start state.
    pub fn reset(&mut self)
    {
        log::debug!("workspace reset: {} cells", self.cells.len());

        for c in &self.cells {
            F::store(c, F::zero());
        }
    }

    /// Loads a warm-start state.
    ///
    /// Returns `Err` with [`SolverError::InvalidSize`] if the lengths mismatch `9n`.
    /// * `w` is the dual state.
    /// * `ys` is the dual accumulator.
    pub fn warm_start(&mut self, w: &[F], ys: &[F]) -> Result<(), SolverError>
    {
        let len = Layout::new(self.n).dual_len();

        if w.len() != len || ys.len() != len {
            log::error!("Size mismatch: w {}, ys {} must be {}", w.len(), ys.len(), len);
            return Err(SolverError::InvalidSize);
        }

        let mem = self.mem();
        mem.w.store_from(w);
        mem.ys.store_from(ys);

        Ok(())
    }

    /// Snapshot of the primal vector.
    pub fn primal(&self) -> Vec<F>
    {
        snapshot(self.mem().y)
    }

    /// Snapshot of the dual state.
    pub fn dual_state(&self) -> Vec<F>
    {
        snapshot(self.mem().w)
    }

    /// Snapshot of the dual accumulator.
    pub fn dual_acc(&self) -> Vec<F>
    {
        snapshot(self.mem().ys)
    }

    /// Snapshot of the passthrough output.
    pub fn passthrough(&self) -> Vec<F>
    {
        snapshot(self.mem().out)
    }

    /// Snapshot of the command buffer.
    pub fn command(&self) -> [F; 4]
    {
        let mut cmd = [F::zero(); 4];
        self.mem().cmd.load_into(&mut cmd);
        cmd
    }
}

fn snapshot<F: GridFloat>(buf: kaji_core::DevBuf<'_, F>) -> Vec<F>
{
    let mut v = vec![F::zero(); buf.len()];
    buf.load_into(&mut v);
    v
}

//

#[test]
fn test_workspace1()
{
    let mut ws = Workspace::<f64>::new(2);
    assert_eq!(ws.cells().len(), 22 * 3 + 18 * 3 + 4);

    let w: Vec<f64> = (0.. 18).map(|i| i as f64).collect();
    let ys = vec![-1.; 18];
    ws.warm_start(&w, &ys).unwrap();

    assert_eq!(ws.dual_state(), w);
    assert_eq!(ws.dual_acc(), ys);
    assert_eq!(ws.warm_start(&w[.. 9], &ys), Err(SolverError::InvalidSize));

    ws.reset();
    assert!(ws.dual_state().iter().all(|v| *v == 0.));
    assert!(ws.dual_acc().iter().all(|v| *v == 0.));
    assert_eq!(ws.primal().len(), 22);
    assert_eq!(ws.passthrough().len(), 22);
    assert_eq!(ws.command(), [0.; 4]);
}
