/*!
Kaji ([舵](http://www.decodeunicode.org/en/u+8235) in Japanese) means rudder.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

This crate provides the compute core of a once-per-control-cycle ADMM solver
which yields a feasible short-horizon command: a 3-axis control vector \\(u\\)
and a scalar throttle proxy \\(\sigma\\) of the first trajectory node.

The kernel runs one worker per scalar coordinate.
Every phase of an iteration is separated from the next one by a grid-wide barrier,
which is provided by a [`solver::Grid`] implementation:
* [`SeqGrid`] - host-orchestrated, one launch per phase, in this crate.
* `ThreadGrid` - cooperative launch over OS threads, in the `kaji` crate.

This crate is `no_std` and does not rely on dynamic heap allocation.
*/

#![no_std]

pub mod solver;

//

mod floatgeneric;

pub use floatgeneric::*;

//

mod devbuf;
mod layout;

pub use devbuf::*;
pub use layout::*;

//

mod matop;
mod csrop;

pub use matop::*;
pub use csrop::*;

//

mod newton;

pub use newton::*;

//

mod proj_rpos;
mod proj_soc;
mod proj_exp;
mod proj_band;

pub use proj_rpos::*;
pub use proj_soc::*;
pub use proj_exp::*;
pub use proj_band::*;

//

mod kernel;
mod seqgrid;

pub use kernel::*;
pub use seqgrid::*;
