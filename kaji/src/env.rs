use kaji_core::solver::SolverParam;
use num_traits::{Float, Num};

/// Reads a number from an environment variable.
///
/// Returns `Some` with the value if the variable is set and parses, otherwise `None`.
pub fn num_by_env<N: Num + std::fmt::Display>(e: &str) -> Option<N>
{
    if let Some(v) = std::env::var(e).ok()
                     .and_then(|s| {N::from_str_radix(&s, 10).ok()}) {
        log::info!("{}: {}", e, v);
        Some(v)
    }
    else {
        None
    }
}

/// Overrides solver parameters by environment variables
/// `ADMM_ITER`, `NEWTON_MAX_ITER`, `NEWTON_EPS`, `MAX_RESIDENT` and `LOG_PERIOD`.
pub fn set_par_by_env<F: Float + std::fmt::Display>(p: &mut SolverParam<F>)
{
    p.admm_iter = num_by_env("ADMM_ITER").unwrap_or(p.admm_iter);
    p.newton_max_iter = num_by_env("NEWTON_MAX_ITER").unwrap_or(p.newton_max_iter);
    p.newton_eps = num_by_env("NEWTON_EPS").unwrap_or(p.newton_eps);
    p.max_resident = num_by_env("MAX_RESIDENT").or(p.max_resident);
    p.log_period = num_by_env("LOG_PERIOD").unwrap_or(p.log_period);
}

//

#[test]
fn test_num_by_env()
{
    std::env::set_var("KAJI_TEST_NUM_BY_ENV", "42");
    std::env::set_var("KAJI_TEST_NUM_BY_ENV_BAD", "x42");

    assert_eq!(num_by_env::<usize>("KAJI_TEST_NUM_BY_ENV"), Some(42));
    assert_eq!(num_by_env::<f64>("KAJI_TEST_NUM_BY_ENV"), Some(42.));
    assert_eq!(num_by_env::<usize>("KAJI_TEST_NUM_BY_ENV_BAD"), None);
    assert_eq!(num_by_env::<usize>("KAJI_TEST_NUM_BY_ENV_UNSET"), None);
}
