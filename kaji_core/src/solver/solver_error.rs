/// Solver errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverError
{
    /// Length of a problem buffer mismatches the node count.
    InvalidSize,
    /// Problem scales are non-finite or out of range.
    InvalidScale,
    /// Solver parameter out of range.
    InvalidParam,
    /// Invalid [`crate::solver::Operator`].
    InvalidOp,
    /// Shortage of work slice length.
    WorkShortage,
    /// Workers of a launch cannot be resident simultaneously.
    Residency,
    /// A non-finite value appeared during the solve.
    NonFinite,
    /// A worker of a launch panicked.
    WorkerPanic,
}

impl core::fmt::Display for SolverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            SolverError::InvalidSize  => "InvalidSize: buffer length mismatches the node count",
            SolverError::InvalidScale => "InvalidScale: non-finite or out-of-range scales",
            SolverError::InvalidParam => "InvalidParam: solver parameter out of range",
            SolverError::InvalidOp    => "InvalidOp: invalid Operator",
            SolverError::WorkShortage => "WorkShortage: shortage of work slice length",
            SolverError::Residency    => "Residency: workers exceed the resident capacity",
            SolverError::NonFinite    => "NonFinite: non-finite value during the solve",
            SolverError::WorkerPanic  => "WorkerPanic: a worker panicked during the launch",
        })
    }
}

//

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
impl std::error::Error for SolverError {}
