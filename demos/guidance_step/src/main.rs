use kaji::prelude::*;
use kaji::*;

use std::str::FromStr;

use anyhow::Result;

type La = FloatGeneric<f64>;
type AProbGuidance = ProbGuidance<La>;
type ASolver = Solver<La>;

const NODE_PRIMAL: usize = 11;
const NODE_DUAL: usize = 9;

/// main
fn main() -> Result<()> {
    env_logger::init();

    //----- parameters

    let mut n = 8; // # of trajectory nodes
    let cycles = 5; // # of control cycles
    let dt = 0.1; // node interval
    let gain = 0.05; // consensus feedback

    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 {
        if let Ok(a) = usize::from_str(&args[1]) {
            n = a; // n can be specified by 1st argument
        }
    }

    let scales = Scales::from_array([
        0.5, // z-scale
        0.8, // exponential lower coefficient
        2.5, // exponential upper coefficient
        1.2, // cone coefficient
        0.6, // pointing coefficient
    ]);

    //----- prior: hover-like thrust with a slowly descending log-mass

    let (np, nd) = (NODE_PRIMAL * n, NODE_DUAL * n);

    let mut prior = vec![0.; np];
    for node in 0.. n {
        let o = NODE_PRIMAL * node;
        prior[o] = 1.6; // u0 along the pointing axis
        prior[o + 1] = 0.2;
        prior[o + 2] = -0.1;
        prior[o + 3] = 10. - dt * node as f64; // altitude
        prior[o + 9] = 1.8; // sigma
        prior[o + 10] = -0.02 * node as f64; // z
    }

    //----- consensus: feeds the cone and exponential band duals back to u, sigma, z

    let mut tilde_c = vec![0.; np * nd];
    for node in 0.. n {
        let o = NODE_PRIMAL * node;
        let soc = 3 * n + 4 * node;
        let exp = 7 * n + 2 * node;
        for i in 0.. 3 {
            tilde_c[(o + i) * nd + soc + i] = gain;
        }
        tilde_c[(o + 9) * nd + soc + 3] = gain;
        tilde_c[(o + 9) * nd + exp] = gain;
        tilde_c[(o + 10) * nd + exp + 1] = gain;
    }

    let z_lb = vec![-0.5; n + 1];
    let z_ub = vec![0.5; n + 1];

    let mut prob = AProbGuidance::new(n, prior, tilde_c, z_lb, z_ub, scales)?;
    let ws = Workspace::new(n);
    let grid = ThreadGrid::default();

    //----- control cycles, warm-started

    for cycle in 0.. cycles {
        let s = ASolver::new().par(|p| {
            p.admm_iter = 40;
            set_par_by_env(p);
        });
        let rslt = s.solve(&grid, prob.problem(&ws)?)?;

        let cmd = rslt.cmd;
        println!("{}: u [{:.4}, {:.4}, {:.4}] sigma {:.4} (newton {} / steps {} / excess {})",
            cycle, cmd.u[0], cmd.u[1], cmd.u[2], cmd.sigma, rslt.newton_solves, rslt.newton_steps, rslt.newton_excess);

        // state estimate moves on
        for node in 0.. n {
            prob.prior_mut()[NODE_PRIMAL * node + 3] -= dt;
        }

        // log-mass floor drops with fuel use
        let (z_lb, _) = prob.bounds_mut();
        for z in z_lb.iter_mut() {
            *z -= 0.01;
        }
    }

    Ok(())
}
