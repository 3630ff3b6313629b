use core::ops::Range;

//

/// Number of primal coordinates per node: control \\(u\\) (3), state \\(x\\) (6), \\(\sigma\\) (1), \\(z\\) (1).
pub const NODE_PRIMAL: usize = 11;

/// Number of dual coordinates per node, summed over all bands.
pub const NODE_DUAL: usize = 9;

/// Constraint band
///
/// A projection worker belongs to one band by its worker id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band
{
    /// Lower bound of \\(z\\).
    ZLower,
    /// Upper bound of \\(z\\).
    ZUpper,
    /// Pointing half-space of \\(u\\) against \\(\sigma\\).
    Pointing,
    /// Thrust second-order cone of \\((u, \sigma)\\).
    Soc,
    /// Two-sided exponential band of \\((\sigma, z)\\).
    Exp,
}

impl Band
{
    /// All bands in order of worker id.
    pub const ALL: [Band; 5] = [Band::ZLower, Band::ZUpper, Band::Pointing, Band::Soc, Band::Exp];

    /// Number of dual coordinates a node owns in this band.
    pub fn width(&self) -> usize
    {
        match self {
            Band::ZLower | Band::ZUpper | Band::Pointing => 1,
            Band::Soc => 4,
            Band::Exp => 2,
        }
    }
}

//

/// Per-node indexing scheme
///
/// For a worker id `idx` and its node `idx % n`,
/// maps to offsets into the primal vector (length `11n`) and the dual vectors (length `9n`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout
{
    n: usize,
}

impl Layout
{
    /// Creates an instance for `n` nodes.
    pub fn new(n: usize) -> Self
    {
        Layout {
            n,
        }
    }

    /// Number of nodes.
    pub fn n(&self) -> usize
    {
        self.n
    }

    /// Length of the primal vector.
    pub fn primal_len(&self) -> usize
    {
        NODE_PRIMAL * self.n
    }

    /// Length of the dual vectors.
    pub fn dual_len(&self) -> usize
    {
        NODE_DUAL * self.n
    }

    /// Number of workers of a launch, one per primal coordinate.
    pub fn worker_len(&self) -> usize
    {
        self.primal_len()
    }

    /// Node owning a worker id.
    pub fn node_of(&self, idx: usize) -> usize
    {
        idx % self.n
    }

    /// Offset of the control vector of `node`.
    pub fn control(&self, node: usize) -> usize
    {
        NODE_PRIMAL * node
    }

    /// Offset of \\(\sigma\\) of `node`.
    pub fn sigma(&self, node: usize) -> usize
    {
        NODE_PRIMAL * node + 9
    }

    /// Offset of \\(z\\) of `node`.
    pub fn z(&self, node: usize) -> usize
    {
        NODE_PRIMAL * node + 10
    }

    /// Band and node of a projection worker.
    ///
    /// Returns `None` for workers idle in the projection phase (`idx >= 5n`).
    pub fn band_of(&self, idx: usize) -> Option<(Band, usize)>
    {
        if self.n == 0 {
            return None;
        }

        Band::ALL.get(idx / self.n).map(|b| (*b, self.node_of(idx)))
    }

    /// Start of the dual block of `band`.
    pub fn dual_offset(&self, band: Band) -> usize
    {
        let n = self.n;

        match band {
            Band::ZLower => 0,
            Band::ZUpper => n,
            Band::Pointing => 2 * n,
            Band::Soc => 3 * n,
            Band::Exp => 7 * n,
        }
    }

    /// Dual coordinates owned by `node` in `band`.
    pub fn dual_range(&self, band: Band, node: usize) -> Range<usize>
    {
        let w = band.width();
        let s = self.dual_offset(band) + w * node;

        s.. s + w
    }
}

//

#[test]
fn test_layout_partition()
{
    for n in 1.. 6 {
        let layout = Layout::new(n);
        let mut owner = [0_usize; 9 * 5];

        for idx in 0.. layout.worker_len() {
            if let Some((band, node)) = layout.band_of(idx) {
                for k in layout.dual_range(band, node) {
                    owner[k] += 1;
                }
            }
            else {
                assert!(idx >= 5 * n);
            }
        }

        // every dual coordinate is owned by exactly one projection worker
        assert!(owner[.. layout.dual_len()].iter().all(|c| *c == 1));
        assert!(owner[layout.dual_len() ..].iter().all(|c| *c == 0));
    }
}

#[test]
fn test_layout_offsets()
{
    let layout = Layout::new(4);

    assert_eq!(layout.primal_len(), 44);
    assert_eq!(layout.dual_len(), 36);
    assert_eq!(layout.node_of(13), 1);
    assert_eq!(layout.control(2), 22);
    assert_eq!(layout.control(3), 33);
    assert_eq!(layout.sigma(2), 31);
    assert_eq!(layout.z(2), 32);

    assert_eq!(layout.band_of(0), Some((Band::ZLower, 0)));
    assert_eq!(layout.band_of(6), Some((Band::ZUpper, 2)));
    assert_eq!(layout.band_of(11), Some((Band::Pointing, 3)));
    assert_eq!(layout.band_of(13), Some((Band::Soc, 1)));
    assert_eq!(layout.band_of(19), Some((Band::Exp, 3)));
    assert_eq!(layout.band_of(20), None);

    assert_eq!(layout.dual_range(Band::Soc, 1), 16.. 20);
    assert_eq!(layout.dual_range(Band::Exp, 3), 34.. 36);
}
