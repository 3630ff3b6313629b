use float_eq::assert_float_eq;
use kaji::prelude::*;
use kaji::*;

type La = FloatGeneric<f64>;

type AProbGuidance = ProbGuidance<La>;
type ASolver = Solver<La>;

//

const N: usize = 1;

fn feasible_prior() -> Vec<f64>
{
    // u, x, sigma, z
    vec![2., 0.5, 0.5, 0., 0., 0., 0., 0., 0., 3., 1.]
}

fn scales() -> Scales<f64>
{
    Scales::from_array([1., 1., 5., 1., 0.5])
}

// maps the first 6 dual coordinates onto the state rows
fn state_consensus() -> Vec<f64>
{
    let mut tilde_c = vec![0.; 11 * 9];
    for k in 0.. 6 {
        tilde_c[(3 + k) * 9 + k] = 1.;
    }
    tilde_c
}

//

#[test]
fn test_guidance_unconstrained()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let prob = AProbGuidance::new(N, feasible_prior(), state_consensus(), vec![0., 0.], vec![0., 2.], scales()).unwrap();
    let ws = Workspace::new(N);

    let rslt = ASolver::new().par(|p| {
        p.admm_iter = 8;
        p.log_period = 1;
    }).solve(&ThreadGrid::new(3), prob.problem(&ws).unwrap()).unwrap();

    assert_eq!(rslt.iter, 8);
    assert!(!rslt.passthrough);
    assert_eq!(rslt.newton_solves, 0);
    assert_float_eq!(rslt.cmd.as_array().as_ref(), [2., 0.5, 0.5, 3.].as_ref(), abs_all <= 1e-12);

    // every band inactive: the dual state is the band primal value
    // [z - z_lb, -z + z_ub, u0 - 0.5 sigma, u, sigma, sigma, z_lb[0]]
    let p = [1., 1., 0.5, 2., 0.5, 0.5, 3., 3., 0.];
    assert_float_eq!(ws.dual_state().as_slice(), p.as_ref(), abs_all <= 1e-12);
    assert_float_eq!(ws.dual_acc().as_slice(), [0.; 9].as_ref(), abs_all <= 1e-12);

    // the unconstrained affine solution: prior + tilde_c p
    let expect = [2., 0.5, 0.5, 1., 1., 0.5, 2., 0.5, 0.5, 3., 1.];
    assert_float_eq!(ws.primal().as_slice(), expect.as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_guidance_passthrough()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let n = 2;
    let (np, nd) = (11 * n, 9 * n);

    let prior: Vec<f64> = (0.. np).map(|i| (i as f64 * 0.7).sin()).collect();
    let tilde_c: Vec<f64> = (0.. np * nd).map(|i| (i as f64 * 0.13).cos() * 0.1).collect();
    let w: Vec<f64> = (0.. nd).map(|i| i as f64 * 0.25).collect();
    let ys: Vec<f64> = (0.. nd).map(|i| 1. - i as f64 * 0.1).collect();

    let mut ws = Workspace::new(n);
    ws.warm_start(&w, &ys).unwrap();

    let mut out = vec![0.; np];
    let mut acc_cmd = [0.; 4];

    let rslt = solve_guidance(&ws, &mut out, &prior, &tilde_c, &[0.; 3], &[1.; 3],
        n, 0, &mut acc_cmd, [1., 1., 5., 1., 0.5]).unwrap();
    assert!(rslt.passthrough);
    assert_eq!(rslt.newton_solves, 0);

    // reference dense matrix-vector computation
    let mut expect = prior.clone();
    for i in 0.. np {
        for k in 0.. nd {
            expect[i] += tilde_c[i * nd + k] * (w[k] - ys[k]);
        }
    }

    assert_float_eq!(out.as_slice(), expect.as_slice(), abs_all <= 1e-12);
    assert_float_eq!(acc_cmd.as_ref(), [expect[0], expect[1], expect[2], expect[9]].as_ref(), abs_all <= 1e-12);

    // no projection: the dual state stays as loaded
    assert_eq!(ws.dual_state(), w);
    assert_eq!(ws.dual_acc(), ys);
}

#[test]
fn test_guidance_warm_start()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // z = -0.5 violates z >= 0, which keeps accumulating the dual with no consensus feedback
    let mut prior = feasible_prior();
    prior[10] = -0.5;

    let prob = AProbGuidance::new(N, prior, vec![0.; 11 * 9], vec![0., 0.], vec![0., 2.], scales()).unwrap();
    let mut ws = Workspace::new(N);
    let s = || ASolver::new().par(|p| p.admm_iter = 5);

    let rslt1 = s().solve(&SeqGrid::default(), prob.problem(&ws).unwrap()).unwrap();
    assert_float_eq!(ws.dual_acc()[0], -2.5, abs <= 1e-12);
    assert_float_eq!(ws.dual_state()[0], 0., abs <= 1e-12);

    // warm: continues from the persisted state
    s().solve(&SeqGrid::default(), prob.problem(&ws).unwrap()).unwrap();
    assert_float_eq!(ws.dual_acc()[0], -5., abs <= 1e-12);

    // fresh: same as the first solve
    ws.reset();
    let rslt2 = s().solve(&SeqGrid::default(), prob.problem(&ws).unwrap()).unwrap();
    assert_eq!(rslt1, rslt2);
    assert_float_eq!(ws.dual_acc()[0], -2.5, abs <= 1e-12);
}

#[test]
fn test_guidance_invalid()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let new = |prior: Vec<f64>, tilde_c: Vec<f64>, z_lb: Vec<f64>, scales: Scales<f64>| {
        AProbGuidance::new(N, prior, tilde_c, z_lb, vec![0., 2.], scales).err()
    };

    assert_eq!(new(vec![0.; 10], vec![0.; 99], vec![0.; 2], scales()), Some(SolverError::InvalidSize));
    assert_eq!(new(vec![0.; 11], vec![0.; 98], vec![0.; 2], scales()), Some(SolverError::InvalidSize));
    assert_eq!(new(vec![0.; 11], vec![0.; 99], vec![0.; 1], scales()), Some(SolverError::InvalidSize));
    assert_eq!(new(vec![0.; 11], vec![0.; 99], vec![0.; 2], Scales::from_array([1., 5., 1., 1., 0.5])), Some(SolverError::InvalidScale));
    assert_eq!(new(vec![0.; 11], vec![0.; 99], vec![0.; 2], Scales::from_array([f64::INFINITY, 1., 5., 1., 0.5])), Some(SolverError::InvalidScale));
    assert_eq!(new(vec![0.; 11], vec![0.; 99], vec![0.; 2], Scales::from_array([1., 1., 5., -1., 0.5])), Some(SolverError::InvalidScale));

    let nan = f64::NAN;
    let mut prior_nan = feasible_prior();
    prior_nan[0] = nan;
    assert_eq!(new(vec![0.; 11], vec![0.; 99], vec![0., nan], scales()), Some(SolverError::NonFinite));
    assert_eq!(new(prior_nan, vec![0.; 99], vec![0.; 2], scales()), Some(SolverError::NonFinite));

    // workspace for another node count
    let prob = AProbGuidance::new(N, feasible_prior(), vec![0.; 99], vec![0.; 2], vec![0., 2.], scales()).unwrap();
    let ws2 = Workspace::new(2);
    assert_eq!(prob.problem(&ws2).err(), Some(SolverError::InvalidSize));

    // entry point lengths
    let ws = Workspace::new(N);
    let mut out = [0.; 4];
    let mut cmd3 = [0.; 3];
    let mut cmd4 = [0.; 4];
    let (prior, tilde_c) = (feasible_prior(), vec![0.; 99]);
    let sc = [1., 1., 5., 1., 0.5];

    assert_eq!(solve_guidance(&ws, &mut out, &prior, &tilde_c, &[0., 0.], &[0., 2.], N, 3, &mut cmd3, sc).err(), Some(SolverError::InvalidSize));
    assert_eq!(solve_guidance(&ws, &mut out, &prior, &tilde_c[.. 98], &[0., 0.], &[0., 2.], N, 3, &mut cmd4, sc).err(), Some(SolverError::InvalidSize));
    assert_eq!(solve_guidance(&ws, &mut out, &prior, &tilde_c, &[0., 0.], &[0., 2.], N, 0, &mut cmd4, sc).err(), Some(SolverError::InvalidSize));
    assert_eq!(solve_guidance(&ws, &mut out, &prior, &tilde_c, &[0.], &[0., 2.], N, 3, &mut cmd4, sc).err(), Some(SolverError::InvalidSize));

    // a NaN bound leaves the warm-start state clean
    assert_eq!(solve_guidance(&ws, &mut out, &prior, &tilde_c, &[0., nan], &[0., 2.], N, 1, &mut cmd4, sc).err(), Some(SolverError::NonFinite));
    assert!(ws.dual_acc().iter().all(|v| *v == 0.));

    let rslt = solve_guidance(&ws, &mut out, &prior, &tilde_c, &[0., 0.], &[0., 2.], N, 3, &mut cmd4, sc).unwrap();
    assert_eq!(out, cmd4);
    assert_float_eq!(rslt.cmd.as_array().as_ref(), [2., 0.5, 0.5, 3.].as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_guidance_nonfinite()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // the boundary value z_lb[0] = -1 with a steep exponent overflows the root-finder
    let prob = AProbGuidance::new(N, feasible_prior(), vec![0.; 99], vec![-1., 0.], vec![0., 2.],
        Scales::from_array([1000., 1., 5., 1., 0.5])).unwrap();
    let ws = Workspace::new(N);

    let rslt = ASolver::new().solve(&ThreadGrid::new(2), prob.problem(&ws).unwrap());
    assert_eq!(rslt, Err(SolverError::NonFinite));

    let rslt = ASolver::new().solve(&SeqGrid::new(Order::Reverse), prob.problem(&ws).unwrap());
    assert_eq!(rslt, Err(SolverError::NonFinite));
}
