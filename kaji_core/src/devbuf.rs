use num_traits::Float;
use core::fmt::{Debug, LowerExp};
use core::sync::atomic::{AtomicU32, AtomicU64, Ordering};

//

/// Floating point type which can be placed in grid-shared memory.
///
/// A value is held as its bit pattern in an atomic cell,
/// so that one worker can write it and other workers can read it after a barrier.
/// Loads and stores are relaxed; the ordering between phases comes from the barrier of a [`crate::solver::Grid`].
pub trait GridFloat: Float + Debug + LowerExp + Send + Sync + 'static
{
    /// Atomic cell type holding a value.
    type Cell: Send + Sync + Debug;

    /// Creates a cell holding `val`.
    fn new_cell(val: Self) -> Self::Cell;

    /// Reads a value from `cell`.
    fn load(cell: &Self::Cell) -> Self;

    /// Writes `val` to `cell`.
    fn store(cell: &Self::Cell, val: Self);
}

impl GridFloat for f32
{
    type Cell = AtomicU32;

    fn new_cell(val: f32) -> AtomicU32
    {
        AtomicU32::new(val.to_bits())
    }

    fn load(cell: &AtomicU32) -> f32
    {
        f32::from_bits(cell.load(Ordering::Relaxed))
    }

    fn store(cell: &AtomicU32, val: f32)
    {
        cell.store(val.to_bits(), Ordering::Relaxed);
    }
}

impl GridFloat for f64
{
    type Cell = AtomicU64;

    fn new_cell(val: f64) -> AtomicU64
    {
        AtomicU64::new(val.to_bits())
    }

    fn load(cell: &AtomicU64) -> f64
    {
        f64::from_bits(cell.load(Ordering::Relaxed))
    }

    fn store(cell: &AtomicU64, val: f64)
    {
        cell.store(val.to_bits(), Ordering::Relaxed);
    }
}

//

/// Device buffer
///
/// Borrowed view of grid-shared memory.
/// Each coordinate shall have at most one writer in a phase.
#[derive(Debug)]
pub struct DevBuf<'a, F: GridFloat>
{
    cells: &'a [F::Cell],
}

// atomic cells are not `Clone`, while a view of them is
impl<'a, F: GridFloat> Clone for DevBuf<'a, F>
{
    fn clone(&self) -> Self
    {
        *self
    }
}

impl<'a, F: GridFloat> Copy for DevBuf<'a, F> {}

impl<'a, F: GridFloat> DevBuf<'a, F>
{
    /// Creates an instance.
    ///
    /// Returns [`DevBuf`] instance.
    /// * `cells` is a slice of cells to view.
    pub fn new(cells: &'a [F::Cell]) -> Self
    {
        DevBuf {
            cells,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize
    {
        self.cells.len()
    }

    /// Checks if no values.
    pub fn is_empty(&self) -> bool
    {
        self.cells.is_empty()
    }

    /// Reads a value at `idx`.
    pub fn get(&self, idx: usize) -> F
    {
        F::load(&self.cells[idx])
    }

    /// Writes `val` at `idx`.
    pub fn set(&self, idx: usize, val: F)
    {
        F::store(&self.cells[idx], val);
    }

    /// Writes `val` to all values.
    pub fn fill(&self, val: F)
    {
        for c in self.cells {
            F::store(c, val);
        }
    }

    /// Copies all values into `dst`, which shall have the same length.
    pub fn load_into(&self, dst: &mut [F])
    {
        assert_eq!(self.len(), dst.len());

        for (c, d) in self.cells.iter().zip(dst) {
            *d = F::load(c);
        }
    }

    /// Copies all values from `src`, which shall have the same length.
    pub fn store_from(&self, src: &[F])
    {
        assert_eq!(self.len(), src.len());

        for (c, s) in self.cells.iter().zip(src) {
            F::store(c, *s);
        }
    }

    /// Splits into two views at `mid`.
    pub fn split(&self, mid: usize) -> (Self, Self)
    {
        let (a, b) = self.cells.split_at(mid);
        (DevBuf::new(a), DevBuf::new(b))
    }
}

//

#[test]
fn test_devbuf1()
{
    use float_eq::assert_float_eq;

    let cells = [
        f32::new_cell(1.5), f32::new_cell(-2.),
        f32::new_cell(0.), f32::new_cell(f32::INFINITY),
    ];
    let buf = DevBuf::<f32>::new(&cells);

    assert_eq!(buf.len(), 4);
    assert_eq!(buf.get(3), f32::INFINITY);

    let (head, tail) = buf.split(1);
    assert_eq!(head.len(), 1);
    tail.fill(7.);

    let mut dst = [0.; 4];
    buf.load_into(&mut dst);
    assert_float_eq!(dst.as_ref(), [1.5, 7., 7., 7.].as_ref(), abs_all <= 1e-6);

    buf.store_from(&[-0.25, 0., 1., 2.]);
    assert_float_eq!(buf.get(0), -0.25, abs <= 1e-6);
}

#[test]
fn test_devbuf_copy()
{
    let cells = [f64::new_cell(0.), f64::new_cell(0.)];
    let buf = DevBuf::<f64>::new(&cells);

    // views passed by value alias the same cells
    let set = |b: DevBuf<'_, f64>, v: f64| b.fill(v);
    set(buf, 3.);
    let other = buf;
    set(other, 4.);

    assert_eq!(buf.get(0), 4.);
    assert_eq!(other.get(1), 4.);
}
