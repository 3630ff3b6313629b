//! Linear operator

use crate::{GridFloat, DevBuf};

/// Linear operator trait
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Expresses a linear operator \\(K: \mathbb{R}^n \to \mathbb{R}^m\\) (or a matrix \\(K \in \mathbb{R}^{m \times n}\\)).
/// The ADMM kernel maps a dual residual to a primal update with it,
/// one row per worker, so any representation of \\(K\\) can be substituted.
pub trait Operator<F: GridFloat>
{
    /// Size of \\(K\\).
    ///
    /// Returns a tuple of \\(m\\) and \\(n\\).
    fn size(&self) -> (usize, usize);

    /// Calculate \\(\sum_{j=0}^{n-1} K_{ij} x_j\\).
    ///
    /// Returns the calculated value.
    /// * `row` is \\(i\\), less than \\(m\\).
    /// * `x` is a vector \\(x\\).
    ///   The length of `x` shall be \\(n\\).
    ///
    /// The calculation shall be equivalent to the general reference implementation shown below.
    /// ```
    /// # use num_traits::Zero;
    /// # use kaji_core::solver::Operator;
    /// # use kaji_core::{GridFloat, DevBuf};
    /// # struct OpRef<F>(std::vec::Vec<std::vec::Vec<F>>);
    /// impl<F: GridFloat> Operator<F> for OpRef<F>
    /// {
    /// #   fn size(&self) -> (usize, usize) {(self.0.len(), self.0[0].len())}
    ///     fn op_row(&self, row: usize, x: DevBuf<'_, F>) -> F
    ///     {
    ///         let (_, n) = self.size();
    ///
    ///         let mut sum = F::zero();
    ///         for j in 0.. n {
    ///             sum = sum + self.0[row][j] * x.get(j);
    ///         }
    ///         sum
    ///     }
    /// }
    /// ```
    fn op_row(&self, row: usize, x: DevBuf<'_, F>) -> F;
}
