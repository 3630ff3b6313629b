use crate::solver::{Operator, SolverError};
use crate::{GridFloat, DevBuf};

//

/// Sparse matrix operator
///
/// Matrix in compressed sparse row form, which borrows its arrays and implements [`Operator`].
/// A factorized consensus map with few nonzeros per row can be substituted for a dense [`crate::MatOp`].
#[derive(Debug, Clone, Copy)]
pub struct CsrOp<'a, F: GridFloat>
{
    n_row: usize,
    n_col: usize,
    row_ptr: &'a [usize],
    col_idx: &'a [usize],
    val: &'a [F],
}

impl<'a, F: GridFloat> CsrOp<'a, F>
{
    /// Creates an instance
    ///
    /// Returns [`CsrOp`] instance, or `Err` with [`SolverError::InvalidOp`] if the arrays are inconsistent.
    /// * `n_row`, `n_col`: number of rows and columns.
    /// * `row_ptr`: `n_row + 1` nondecreasing offsets into `col_idx` and `val`, starting at zero.
    /// * `col_idx`: column of each nonzero, less than `n_col`.
    /// * `val`: value of each nonzero.
    pub fn new(n_row: usize, n_col: usize, row_ptr: &'a [usize], col_idx: &'a [usize], val: &'a [F]) -> Result<Self, SolverError>
    {
        if row_ptr.len() != n_row + 1 || col_idx.len() != val.len() {
            log::error!("CSR length mismatch: row_ptr {}, col_idx {}, val {}", row_ptr.len(), col_idx.len(), val.len());
            return Err(SolverError::InvalidOp);
        }

        if row_ptr[0] != 0 || row_ptr[n_row] != val.len() || row_ptr.windows(2).any(|w| w[0] > w[1]) {
            log::error!("CSR row_ptr is not a valid offset array");
            return Err(SolverError::InvalidOp);
        }

        if col_idx.iter().any(|c| *c >= n_col) {
            log::error!("CSR col_idx out of {} columns", n_col);
            return Err(SolverError::InvalidOp);
        }

        Ok(CsrOp {
            n_row, n_col, row_ptr, col_idx, val,
        })
    }

    /// Number of nonzeros.
    pub fn nnz(&self) -> usize
    {
        self.val.len()
    }
}

impl<'a, F: GridFloat> Operator<F> for CsrOp<'a, F>
{
    fn size(&self) -> (usize, usize)
    {
        (self.n_row, self.n_col)
    }

    fn op_row(&self, row: usize, x: DevBuf<'_, F>) -> F
    {
        assert!(row < self.n_row);
        assert_eq!(x.len(), self.n_col);

        let range = self.row_ptr[row].. self.row_ptr[row + 1];

        let mut sum = F::zero();
        for (c, v) in self.col_idx[range.clone()].iter().zip(&self.val[range]) {
            sum = sum + *v * x.get(*c);
        }
        sum
    }
}

//

#[test]
fn test_csrop1()
{
    use float_eq::assert_float_eq;
    use crate::{MatOp, MatType};

    let dense = &[ // 3x4 row-major
        0., 2., 0., -1.,
        0., 0., 0., 0.,
        3., 0., 0.5, 0.,
    ];
    let row_ptr = &[0, 2, 2, 4];
    let col_idx = &[1, 3, 0, 2];
    let val = &[2., -1., 3., 0.5];

    let cells = [f64::new_cell(1.), f64::new_cell(2.), f64::new_cell(-4.), f64::new_cell(0.25)];
    let x = DevBuf::<f64>::new(&cells);

    let d = MatOp::new(MatType::RowMajor(3, 4), dense);
    let s = CsrOp::new(3, 4, row_ptr, col_idx, val).unwrap();

    assert_eq!(s.nnz(), 4);
    assert_eq!(s.size(), d.size());
    for i in 0.. 3 {
        assert_float_eq!(s.op_row(i, x), d.op_row(i, x), abs <= 1e-12);
    }
}

#[test]
fn test_csrop_invalid()
{
    let val = &[1_f64, 2.];

    assert_eq!(CsrOp::new(2, 2, &[0, 1], &[0, 1], val).err(), Some(SolverError::InvalidOp));
    assert_eq!(CsrOp::new(2, 2, &[0, 2, 1], &[0, 1], val).err(), Some(SolverError::InvalidOp));
    assert_eq!(CsrOp::new(2, 2, &[0, 1, 2], &[0, 2], val).err(), Some(SolverError::InvalidOp));
    assert!(CsrOp::new(2, 2, &[0, 1, 2], &[0, 1], val).is_ok());
}
