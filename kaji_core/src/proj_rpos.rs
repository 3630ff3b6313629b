use num_traits::Zero;
use core::marker::PhantomData;
use crate::solver::{Proj, ProjStat, LinAlg, SolverError};

//

/// Nonnegative orthant
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// \mathbb{R}\_+^n =
/// \left\lbrace x \in \mathbb{R}^n
/// \ \middle|\ x_i \ge 0,\ i=1,\ldots,n
/// \right\rbrace
/// \\]
///
/// The bound and half-space bands project their one-dimensional slack onto \\(\mathbb{R}\_+\\).
pub struct ProjRPos<L: LinAlg>
{
    ph_l: PhantomData<L>,
}

impl<L: LinAlg> ProjRPos<L>
{
    /// Creates an instance.
    ///
    /// Returns [`ProjRPos`] instance.
    pub fn new() -> Self
    {
        ProjRPos {
            ph_l: PhantomData,
        }
    }
}

impl<L: LinAlg> Default for ProjRPos<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<L: LinAlg> Proj<L> for ProjRPos<L>
{
    fn proj(&self, x: &mut [L::F]) -> Result<ProjStat, SolverError>
    {
        L::max_lb(L::F::zero(), x);
        Ok(ProjStat::default())
    }
}

//

#[test]
fn test_rpos1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let p = ProjRPos::<L>::new();
    let x = &mut [-1.5, 0., 2.];

    let stat = p.proj(x).unwrap();
    assert_eq!(stat, ProjStat::default());
    assert_float_eq!(x.as_ref(), [0., 0., 2.].as_ref(), abs_all <= 1e-12);

    // feasible points stay
    p.proj(x).unwrap();
    assert_float_eq!(x.as_ref(), [0., 0., 2.].as_ref(), abs_all <= 1e-12);
}
