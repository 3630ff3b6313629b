use num_traits::{Zero, One};
use crate::solver::{Proj, ProjStat, LinAlg, SolverError};

//

/// Scaled second-order (or quadratic) cone
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// \mathcal{Q}\_t^n =
/// \left\lbrace (v, s) \in \mathbb{R}^{n-1} \times \mathbb{R}
/// \ \middle|\ \\|v\\|_2 \le t s
/// \right\rbrace
/// \\]
///
/// `x` is laid out as \\(v\\) followed by \\(s\\), that is the control vector then \\(\sigma\\).
pub struct ProjSOC<L: LinAlg>
{
    coef: L::F,
}

impl<L: LinAlg> ProjSOC<L>
{
    /// Creates an instance.
    ///
    /// Returns [`ProjSOC`] instance.
    /// * `coef` is the cone coefficient \\(t\\), which shall be positive.
    pub fn new(coef: L::F) -> Self
    {
        ProjSOC {
            coef,
        }
    }
}

impl<L: LinAlg> Proj<L> for ProjSOC<L>
{
    fn proj(&self, x: &mut [L::F]) -> Result<ProjStat, SolverError>
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();
        let t = self.coef;

        if let Some((s, v)) = x.split_last_mut() {
            let val_s = *s;
            let norm_v = L::norm(v);

            if norm_v <= t * val_s {
                // as they are
            }
            else if t * norm_v <= -val_s {
                // polar cone
                L::scale(f0, v);
                *s = f0;
            }
            else if norm_v > f0 {
                let alpha = (t * norm_v + val_s) / (f1 + t * t);
                L::scale(alpha * t / norm_v, v);
                *s = alpha;
            }
        }

        Ok(ProjStat::default())
    }
}

//
