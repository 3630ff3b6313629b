use kaji_core::solver::{Solver, SolveReport, SolverError};
use kaji_core::{FloatGeneric, GridFloat, Layout, MatOp, MatType, Scales};
use crate::{ThreadGrid, Workspace};

/// Solves a guidance problem on a [`ThreadGrid`] in one call.
///
/// Returns `Ok` with [`SolveReport`], or `Err` with [`SolverError`] type.
/// Every length is checked against `n` before launch.
/// * `ws` is a [`Workspace`] for `n` nodes, whose warm-start state is used and updated.
/// * `out` receives the command in its first 4 elements,
///   or the whole passthrough vector of length `11n` if `admm_iter` is zero.
/// * `prior` is the fixed offset of the affine step, of length `11n`.
/// * `tilde_c` is the consensus matrix `tilde_c[primal][dual]` in row-major, of length `11n * 9n`.
/// * `z_lb` and `z_ub` are bounds of \\(z\\), of length `n + 1` each.
/// * `n` is a number of nodes.
/// * `admm_iter` is a number of ADMM iterations.
/// * `acc_cmd` receives the command, of length 4.
/// * `scales` is z-scale, exponential lower/upper coefficients, cone coefficient and pointing coefficient.
#[allow(clippy::too_many_arguments)]
pub fn solve_guidance<F: GridFloat>(
    ws: &Workspace<F>, out: &mut [F],
    prior: &[F], tilde_c: &[F], z_lb: &[F], z_ub: &[F],
    n: usize, admm_iter: usize, acc_cmd: &mut [F], scales: [F; 5]
) -> Result<SolveReport<F>, SolverError>
{
    let layout = Layout::new(n);
    let (np, nd) = (layout.primal_len(), layout.dual_len());

    let out_len = if admm_iter == 0 {np} else {4};

    if ws.n() != n || tilde_c.len() != np * nd || acc_cmd.len() != 4 || out.len() < out_len {
        log::error!("Size mismatch: n {}, workspace {}, tilde_c {}, acc_cmd {}, out {} must be >= {}",
            n, ws.n(), tilde_c.len(), acc_cmd.len(), out.len(), out_len);
        return Err(SolverError::InvalidSize);
    }

    let op = MatOp::new(MatType::RowMajor(np, nd), tilde_c);

    let s = Solver::<FloatGeneric<F>>::new().par(|p| {
        p.admm_iter = admm_iter;
    });
    let rep = s.solve(&ThreadGrid::default(), (n, op, prior, z_lb, z_ub, Scales::from_array(scales), ws.cells()))?;

    acc_cmd.copy_from_slice(&rep.cmd.as_array());

    if rep.passthrough {
        out[.. np].copy_from_slice(&ws.passthrough());
    }
    else {
        out[.. 4].copy_from_slice(&rep.cmd.as_array());
    }

    Ok(rep)
}
