use std::panic::{self, AssertUnwindSafe};
use std::sync::{Barrier, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use kaji_core::solver::{Grid, GridKernel, LaunchStat, SolverError};

//

/// Threaded grid
///
/// Cooperative launch over OS threads.
/// Each thread emulates a block of up to `block_dim` workers which run in turn,
/// and every step ends at a [`Barrier`] shared by all blocks.
///
/// All workers of a launch shall be resident at once,
/// so a kernel of more than `n_block * block_dim` workers is rejected with [`SolverError::Residency`] before launch.
/// A panicking worker aborts the launch with [`SolverError::WorkerPanic`].
#[derive(Debug, Clone, Copy)]
pub struct ThreadGrid
{
    n_block: usize,
    block_dim: usize,
}

impl ThreadGrid
{
    /// Default max number of workers per block.
    pub const BLOCK_DIM: usize = 1024;

    /// Creates an instance.
    ///
    /// Returns [`ThreadGrid`] instance.
    /// * `n_block` is a number of blocks, that is threads.
    pub fn new(n_block: usize) -> Self
    {
        ThreadGrid {
            n_block: n_block.max(1),
            block_dim: Self::BLOCK_DIM,
        }
    }

    /// Changes the max number of workers per block.
    ///
    /// Returns [`ThreadGrid`] with its block size changed.
    pub fn block_dim(mut self, block_dim: usize) -> Self
    {
        self.block_dim = block_dim;
        self
    }

    /// Number of blocks.
    pub fn n_block(&self) -> usize
    {
        self.n_block
    }
}

impl Default for ThreadGrid
{
    fn default() -> Self
    {
        let n_block = thread::available_parallelism()
                      .map(|n| n.get())
                      .unwrap_or(1);

        Self::new(n_block)
    }
}

impl Grid for ThreadGrid
{
    fn capacity(&self) -> Option<usize>
    {
        Some(self.n_block * self.block_dim)
    }

    fn launch<K: GridKernel>(&self, kernel: &K) -> Result<LaunchStat, SolverError>
    {
        let len = kernel.worker_len();
        let cap = self.n_block * self.block_dim;

        if len > cap {
            log::error!("Workers {} exceed the resident capacity {} ({} blocks x {})", len, cap, self.n_block, self.block_dim);
            return Err(SolverError::Residency);
        }

        let per_block = (len + self.n_block - 1) / self.n_block;
        log::trace!("launch: {} workers on {} blocks, {} per block", len, self.n_block, per_block);

        let barrier = Barrier::new(self.n_block);
        let abort = AtomicBool::new(false);
        let first_err: Mutex<Option<SolverError>> = Mutex::new(None);
        let total: Mutex<LaunchStat> = Mutex::new(LaunchStat::default());

        thread::scope(|s| {
            for b in 0.. self.n_block {
                let (barrier, abort, first_err, total) = (&barrier, &abort, &first_err, &total);
                let workers = (b * per_block).min(len).. ((b + 1) * per_block).min(len);

                s.spawn(move || {
                    let mut stat = LaunchStat::default();

                    for step in kernel.schedule() {
                        // keep arriving at every barrier even after an abort
                        if !abort.load(Ordering::Relaxed) {
                            for idx in workers.clone() {
                                let rslt = panic::catch_unwind(AssertUnwindSafe(|| kernel.run(step, idx)))
                                           .unwrap_or(Err(SolverError::WorkerPanic));

                                match rslt {
                                    Ok(ps) => stat.count(&ps),
                                    Err(e) => {
                                        log::debug!("{:?}: worker {} failed: {}", step, idx, e);
                                        abort.store(true, Ordering::Relaxed);
                                        if let Ok(mut fe) = first_err.lock() {
                                            fe.get_or_insert(e);
                                        }
                                        break;
                                    },
                                }
                            }
                        }

                        barrier.wait();
                    }

                    if let Ok(mut t) = total.lock() {
                        t.merge(&stat);
                    }
                });
            }
        });

        if let Some(e) = first_err.into_inner().ok().flatten() {
            return Err(e);
        }

        let mut stat = total.into_inner().unwrap_or_default();
        stat.phases = kernel.schedule().len();

        Ok(stat)
    }
}
