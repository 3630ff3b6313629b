use num_traits::Float;
use core::marker::PhantomData;
use crate::solver::LinAlg;

/// `num::Float`-generic [`LinAlg`] implementation
///
/// All numeric operations are written in pure Rust.
#[derive(Debug, Clone, Copy)]
pub struct FloatGeneric<F>
{
    ph_f: PhantomData<F>,
}

impl<F: Float> LinAlg for FloatGeneric<F>
{
    type F = F;

    fn norm(x: &[F]) -> F
    {
        let mut sum = F::zero();
        for u in x {
            sum = sum + *u * *u;
        }
        sum.sqrt()
    }

    fn dot(x: &[F], y: &[F]) -> F
    {
        assert_eq!(x.len(), y.len());

        let mut sum = F::zero();
        for (u, v) in x.iter().zip(y) {
            sum = sum + *u * *v;
        }
        sum
    }

    fn copy(x: &[F], y: &mut [F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *u;
        }
    }

    fn scale(alpha: F, x: &mut [F])
    {
        for u in x {
            *u = alpha * *u;
        }
    }

    fn add(alpha: F, x: &[F], y: &mut [F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *v + alpha * *u;
        }
    }

    fn max_lb(lb: F, x: &mut [F])
    {
        for u in x {
            *u = u.max(lb);
        }
    }
}

//

#[test]
fn test_floatgeneric1()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    let x = &mut [3., -4., 0.];
    let y = &mut [1., 1., 1.];

    assert_float_eq!(L::norm(x), 5., abs <= 1e-12);
    assert_float_eq!(L::dot(x, y), -1., abs <= 1e-12);

    L::add(2., x, y);
    assert_float_eq!(y.as_ref(), [7., -7., 1.].as_ref(), abs_all <= 1e-12);

    L::max_lb(0., y);
    assert_float_eq!(y.as_ref(), [7., 0., 1.].as_ref(), abs_all <= 1e-12);

    L::scale(0.5, x);
    L::copy(x, y);
    assert_float_eq!(y.as_ref(), [1.5, -2., 0.].as_ref(), abs_all <= 1e-12);
}
