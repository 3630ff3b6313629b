use crate::solver::Operator;
use crate::{GridFloat, DevBuf};

//

/// Matrix type and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatType
{
    /// General matrix with a number of rows and a number of columns, stored in column-major.
    General(usize, usize),
    /// General matrix with a number of rows and a number of columns, stored in row-major.
    RowMajor(usize, usize),
}

impl MatType
{
    /// Length of array to store a [`MatType`] matrix.
    ///
    /// Returns the length.
    pub fn len(&self) -> usize
    {
        match self {
            MatType::General(n_row, n_col) => n_row * n_col,
            MatType::RowMajor(n_row, n_col) => n_row * n_col,
        }
    }

    /// Size of a [`MatType`] matrix.
    ///
    /// Returns a tuple of a number of rows and a number of columns.
    pub fn size(&self) -> (usize, usize)
    {
        match self {
            MatType::General(n_row, n_col) => (*n_row, *n_col),
            MatType::RowMajor(n_row, n_col) => (*n_row, *n_col),
        }
    }
}

//

/// Matrix operator
///
/// Dense matrix struct which borrows a slice of data array and implements [`Operator`].
///
/// The consensus matrix \\(\tilde{C}\\) indexed as `tilde_c[primal][dual]`
/// is a [`MatType::RowMajor`] matrix of `11n` rows and `9n` columns.
#[derive(Debug, Clone, Copy)]
pub struct MatOp<'a, F: GridFloat>
{
    typ: MatType,
    array: &'a [F],
}

impl<'a, F: GridFloat> MatOp<'a, F>
{
    /// Creates an instance
    ///
    /// Returns [`MatOp`] instance.
    /// * `typ`: Matrix type and size.
    /// * `array`: data array slice, whose length shall be `typ.len()`.
    pub fn new(typ: MatType, array: &'a [F]) -> Self
    {
        assert_eq!(typ.len(), array.len());

        MatOp {
            typ,
            array,
        }
    }
}

impl<'a, F: GridFloat> Operator<F> for MatOp<'a, F>
{
    fn size(&self) -> (usize, usize)
    {
        self.typ.size()
    }

    fn op_row(&self, row: usize, x: DevBuf<'_, F>) -> F
    {
        let mut sum = F::zero();

        match self.typ {
            MatType::General(nr, nc) => {
                assert!(row < nr);
                assert_eq!(x.len(), nc);

                for c in 0.. nc {
                    sum = sum + self.array[c * nr + row] * x.get(c);
                }
            },
            MatType::RowMajor(nr, nc) => {
                assert!(row < nr);
                assert_eq!(x.len(), nc);

                let (_, rest) = self.array.split_at(row * nc);
                for (c, a) in rest[.. nc].iter().enumerate() {
                    sum = sum + *a * x.get(c);
                }
            },
        }

        sum
    }
}

impl<'a, F: GridFloat> AsRef<[F]> for MatOp<'a, F>
{
    fn as_ref(&self) -> &[F]
    {
        self.array
    }
}

//

#[test]
fn test_matop1()
{
    use float_eq::assert_float_eq;

    let col_major = &[ // 3x2
        1., 2., 3.,
        4., 5., 6.,
    ];
    let row_major = &[ // 3x2, same matrix
        1., 4.,
        2., 5.,
        3., 6.,
    ];
    let cells = [f64::new_cell(0.5), f64::new_cell(-1.)];
    let x = DevBuf::<f64>::new(&cells);

    let g = MatOp::new(MatType::General(3, 2), col_major);
    let r = MatOp::new(MatType::RowMajor(3, 2), row_major);

    assert_eq!(g.size(), (3, 2));
    assert_eq!(r.size(), (3, 2));

    let expect = [-3.5, -4., -4.5];
    for i in 0.. 3 {
        assert_float_eq!(g.op_row(i, x), expect[i], abs <= 1e-12);
        assert_float_eq!(r.op_row(i, x), expect[i], abs <= 1e-12);
    }
}
