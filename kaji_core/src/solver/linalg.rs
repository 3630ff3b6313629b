//! Linear algebra

use num_traits::Float;

/// Linear algebra trait.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Only small per-node vectors go through this trait;
/// grid-shared buffers are accessed by [`crate::DevBuf`].
pub trait LinAlg
{
    /// Floating point data type used as scalars.
    type F: Float;

    /// Calculate 2-norm (or euclidean norm) \\(\\|x\\|_2=\sqrt{\sum_i x_i^2}\\).
    ///
    /// Returns the calculated norm.
    /// * `x` is a vector \\(x\\).
    fn norm(x: &[Self::F]) -> Self::F;

    /// Calculate inner product \\(x^T y\\).
    ///
    /// Returns the calculated product.
    /// * `x` and `y` shall have the same length.
    fn dot(x: &[Self::F], y: &[Self::F]) -> Self::F;

    /// Copy from a vector to another vector.
    ///
    /// * `x` is a slice to copy.
    /// * `y` is a slice being copied to.
    ///   `x` and `y` shall have the same length.
    fn copy(x: &[Self::F], y: &mut [Self::F]);

    /// Calculate \\(\alpha x\\).
    ///
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\) before entry, \\(\alpha x\\) on exit.
    fn scale(alpha: Self::F, x: &mut [Self::F]);

    /// Calculate \\(\alpha x + y\\).
    ///
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\).
    /// * `y` is a vector \\(y\\) before entry, \\(\alpha x + y\\) on exit.
    ///   `x` and `y` shall have the same length.
    fn add(alpha: Self::F, x: &[Self::F], y: &mut [Self::F]);

    /// Calculate \\(\max(x_i, l)\\) elementwise.
    ///
    /// * `lb` is a lower bound \\(l\\).
    /// * `x` is a vector \\(x\\) before entry, clamped from below on exit.
    fn max_lb(lb: Self::F, x: &mut [Self::F]);
}
