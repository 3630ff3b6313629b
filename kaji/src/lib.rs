/*!
Kaji ([舵](http://www.decodeunicode.org/en/u+8235) in Japanese) means rudder.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

This crate for Rust provides a **once-per-control-cycle guidance command solver** driving [`kaji_core`] kernels.

# General usage

1. A guidance problem of \\(N\\) trajectory nodes is assumed to be prepared upstream:
   a prior vector, a pre-factorized consensus matrix, bounds of \\(z\\) and five scales.
   Refer to [`ProbGuidance`] and [`prelude::Solver`] about their formulations.
1. Construct your problem with [`ProbGuidance::new`], which checks every length.
1. Allocate a [`Workspace`] once for \\(N\\). It keeps the warm-start state over control cycles.
1. Choose a [`kaji_core::solver::Grid`] implementation to use:
   * [`ThreadGrid`] - cooperative launch over OS threads.
   * [`prelude::SeqGrid`] - host-orchestrated, one worker at a time.
1. Create a [`prelude::Solver`] instance and optionally set its parameters.
1. Feed the problem to the solver and invoke [`prelude::Solver::solve`] to get a command.

[`solve_guidance`] does all of the above in one call for borrowed buffers.

# Examples

A single node whose prior is already feasible yields the prior's control vector and \\(\sigma\\) as is.

```
use float_eq::assert_float_eq;
use kaji::prelude::*;
use kaji::*;

//env_logger::init(); // Use any logger crate as `kaji` uses `log` crate.

type La = FloatGeneric<f64>;
type AProbGuidance = ProbGuidance<La>;
type ASolver = Solver<La>;

let n = 1;

// u, x, sigma, z
let prior = vec![2., 0.5, 0.5, 0., 0., 0., 0., 0., 0., 3., 1.];
let tilde_c = vec![0.; 11 * 9];
let z_lb = vec![0., 0.];
let z_ub = vec![0., 2.];
let scales = Scales::from_array([1., 1., 5., 1., 0.5]);

let prob = AProbGuidance::new(n, prior, tilde_c, z_lb, z_ub, scales).unwrap();
let ws = Workspace::new(n);

let s = ASolver::new().par(|p| {
   p.admm_iter = 20;
});
let rslt = s.solve(&ThreadGrid::new(2), prob.problem(&ws).unwrap()).unwrap();

assert_float_eq!(rslt.cmd.as_array().as_ref(), [2., 0.5, 0.5, 3.].as_ref(), abs_all <= 1e-9);
```
*/

mod prob;
mod workspace;

pub use prob::*;
pub use workspace::*;

//

mod threadgrid;

pub use threadgrid::*;

//

mod guidance;
mod env;

pub use guidance::*;
pub use env::*;

//

/// Prelude
pub mod prelude
{
   pub use kaji_core::solver::{Solver, SolverError, SolverParam, SolveReport, Command, Grid};
   pub use kaji_core::{FloatGeneric, MatType, Scales, SeqGrid, Order};
}
