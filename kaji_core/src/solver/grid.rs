//! Phase schedule and grid-wide barrier protocol

use crate::solver::{ProjStat, SolverError};

/// Phase of a kernel launch.
///
/// Every worker of a launch finishes a phase before any worker begins the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase
{
    /// Dual residual `w - ys` per dual coordinate.
    ResidualCompute,
    /// Affine consensus candidate per primal coordinate.
    AffineUpdate,
    /// Projection of each constraint band and its dual update.
    ProjectionDispatch,
    /// Candidate committed to the primal vector.
    Commit,
    /// Command extraction by a designated worker.
    OutputExtraction,
    /// Candidate copied to the passthrough output, when no iteration runs.
    Passthrough,
}

/// Step of a launch: a phase in an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step
{
    /// Iteration number, starting from zero.
    pub iter: usize,
    /// Phase to run.
    pub phase: Phase,
}

//

const ITER_PHASES: [Phase; 4] = [
    Phase::ResidualCompute,
    Phase::AffineUpdate,
    Phase::ProjectionDispatch,
    Phase::Commit,
];

const PASS_PHASES: [Phase; 3] = [
    Phase::ResidualCompute,
    Phase::AffineUpdate,
    Phase::Passthrough,
];

/// Phase order of a launch.
///
/// For `admm_iter > 0`, yields the four phases of every iteration then [`Phase::OutputExtraction`].
/// For `admm_iter == 0`, yields a single affine step followed by [`Phase::Passthrough`].
#[derive(Debug, Clone)]
pub struct Schedule
{
    admm_iter: usize,
    pos: usize,
}

impl Schedule
{
    /// Max number of ADMM iterations of a launch.
    pub const MAX_ITER: usize = (usize::MAX - 1) / ITER_PHASES.len();

    /// Creates an instance.
    ///
    /// Returns [`Schedule`] instance.
    /// * `admm_iter` is a number of ADMM iterations, up to [`Schedule::MAX_ITER`].
    pub fn new(admm_iter: usize) -> Self
    {
        Schedule {
            admm_iter,
            pos: 0,
        }
    }

    fn total(&self) -> usize
    {
        if self.admm_iter == 0 {
            PASS_PHASES.len()
        }
        else {
            ITER_PHASES.len().saturating_mul(self.admm_iter).saturating_add(1)
        }
    }
}

impl Iterator for Schedule
{
    type Item = Step;

    fn next(&mut self) -> Option<Step>
    {
        let total = self.total();
        if self.pos >= total {
            return None;
        }

        let pos = self.pos;
        self.pos += 1;

        let step = if self.admm_iter == 0 {
            Step {
                iter: 0,
                phase: PASS_PHASES[pos],
            }
        }
        else if pos + 1 == total {
            Step {
                iter: self.admm_iter,
                phase: Phase::OutputExtraction,
            }
        }
        else {
            Step {
                iter: pos / ITER_PHASES.len(),
                phase: ITER_PHASES[pos % ITER_PHASES.len()],
            }
        };

        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>)
    {
        let rest = self.total() - self.pos;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for Schedule {}

//

/// Statistics of a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaunchStat
{
    /// Number of phases run.
    pub phases: usize,
    /// Number of projections which ran a Newton-Raphson solve.
    pub newton_solves: usize,
    /// Number of Newton-Raphson solves which exceeded their step budget.
    pub newton_excess: usize,
    /// Total Newton-Raphson steps of all solves.
    pub newton_steps: usize,
}

impl LaunchStat
{
    /// Counts a projection outcome.
    pub fn count(&mut self, stat: &ProjStat)
    {
        if stat.newton {
            self.newton_solves += 1;
        }
        if stat.newton_excess {
            self.newton_excess += 1;
        }
        self.newton_steps += stat.newton_iter;
    }

    /// Adds the counts of another worker group.
    pub fn merge(&mut self, other: &LaunchStat)
    {
        self.newton_solves += other.newton_solves;
        self.newton_excess += other.newton_excess;
        self.newton_steps += other.newton_steps;
    }
}

//

/// Kernel trait
///
/// A kernel body run by every worker of a launch, step by step.
pub trait GridKernel: Sync
{
    /// Number of workers of a launch.
    fn worker_len(&self) -> usize;

    /// Phase order of a launch.
    fn schedule(&self) -> Schedule;

    /// Runs a step of a worker.
    ///
    /// Returns `Ok` with [`ProjStat`] of the step, or `Err` if the launch shall be aborted.
    /// * `step` is a step given by [`GridKernel::schedule`].
    /// * `idx` is a worker id less than [`GridKernel::worker_len`].
    fn run(&self, step: Step, idx: usize) -> Result<ProjStat, SolverError>;
}

/// Grid trait
///
/// Launches a kernel with a grid-wide barrier between every two steps.
/// A missing barrier would be a data race between phases, so an implementation shall not fuse steps.
pub trait Grid
{
    /// Number of workers which can be resident simultaneously.
    ///
    /// Returns `None` if unlimited.
    fn capacity(&self) -> Option<usize>
    {
        None
    }

    /// Launches a kernel.
    ///
    /// Returns `Ok` with [`LaunchStat`], or `Err` with the first error of the workers.
    fn launch<K: GridKernel>(&self, kernel: &K) -> Result<LaunchStat, SolverError>;
}

//

#[test]
fn test_schedule1()
{
    let s = Schedule::new(2);
    assert_eq!(s.len(), 9);

    let steps: [Option<Step>; 10] = {
        let mut s = Schedule::new(2);
        core::array::from_fn(|_| s.next())
    };

    assert_eq!(steps[0], Some(Step {iter: 0, phase: Phase::ResidualCompute}));
    assert_eq!(steps[3], Some(Step {iter: 0, phase: Phase::Commit}));
    assert_eq!(steps[4], Some(Step {iter: 1, phase: Phase::ResidualCompute}));
    assert_eq!(steps[6], Some(Step {iter: 1, phase: Phase::ProjectionDispatch}));
    assert_eq!(steps[8], Some(Step {iter: 2, phase: Phase::OutputExtraction}));
    assert_eq!(steps[9], None);
}

#[test]
fn test_schedule_passthrough()
{
    let mut s = Schedule::new(0);
    assert_eq!(s.len(), 3);

    assert_eq!(s.next().map(|st| st.phase), Some(Phase::ResidualCompute));
    assert_eq!(s.next().map(|st| st.phase), Some(Phase::AffineUpdate));
    assert_eq!(s.next().map(|st| st.phase), Some(Phase::Passthrough));
    assert_eq!(s.next(), None);
    assert_eq!(s.len(), 0);
}

#[test]
fn test_schedule_max_iter()
{
    let s = Schedule::new(Schedule::MAX_ITER);
    assert_eq!(s.len(), 4 * Schedule::MAX_ITER + 1);

    // saturates instead of overflowing
    let s = Schedule::new(usize::MAX);
    assert_eq!(s.len(), usize::MAX);
}
