use crate::solver::{Grid, GridKernel, Step, LaunchStat, SolverError};

//

/// Worker order within a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order
{
    /// Ascending worker id.
    Forward,
    /// Descending worker id.
    Reverse,
    /// Worker ids `0, k, 2k, ...`, then `1, k+1, ...` and so on.
    Strided(usize),
}

/// Sequential grid
///
/// Host-orchestrated grid which runs every worker of a step in turn,
/// as if each step were a separate kernel launch whose boundary is the barrier.
/// Any [`Order`] is a legal interleaving, so results do not depend on it.
#[derive(Debug, Clone, Copy)]
pub struct SeqGrid
{
    order: Order,
}

impl SeqGrid
{
    /// Creates an instance.
    ///
    /// Returns [`SeqGrid`] instance.
    /// * `order` is a worker order within a phase.
    pub fn new(order: Order) -> Self
    {
        SeqGrid {
            order,
        }
    }

    fn run_step<K: GridKernel>(&self, kernel: &K, step: Step, stat: &mut LaunchStat) -> Result<(), SolverError>
    {
        let len = kernel.worker_len();

        match self.order {
            Order::Forward => {
                for idx in 0.. len {
                    stat.count(&kernel.run(step, idx)?);
                }
            },
            Order::Reverse => {
                for idx in (0.. len).rev() {
                    stat.count(&kernel.run(step, idx)?);
                }
            },
            Order::Strided(k) => {
                let k = k.max(1);
                for offset in 0.. k {
                    for idx in (offset.. len).step_by(k) {
                        stat.count(&kernel.run(step, idx)?);
                    }
                }
            },
        }

        Ok(())
    }
}

impl Default for SeqGrid
{
    fn default() -> Self
    {
        Self::new(Order::Forward)
    }
}

impl Grid for SeqGrid
{
    fn launch<K: GridKernel>(&self, kernel: &K) -> Result<LaunchStat, SolverError>
    {
        let mut stat = LaunchStat::default();

        for step in kernel.schedule() {
            log::trace!("{:?}", step);

            self.run_step(kernel, step, &mut stat)?;
            stat.phases += 1;
        }

        Ok(stat)
    }
}

//
