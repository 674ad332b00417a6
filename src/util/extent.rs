//! Grid dimensions and the whole extent advertised for a time series.

/// Point counts of a structured grid along each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl Dimensions {
    /// Create dimensions from per-axis sizes.
    #[inline]
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Sizes as an array, x first.
    #[inline]
    pub fn to_array(self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }

    /// Total number of points (product of all axes).
    ///
    /// Returns `None` on overflow, which only happens for corrupt headers.
    pub fn num_points(self) -> Option<usize> {
        self.nx.checked_mul(self.ny)?.checked_mul(self.nz)
    }

    /// Number of cells; axes with a single point contribute a factor of one.
    pub fn num_cells(self) -> Option<usize> {
        let cells = |n: usize| if n > 1 { n - 1 } else { 1 };
        if self.nx == 0 || self.ny == 0 || self.nz == 0 {
            return Some(0);
        }
        cells(self.nx).checked_mul(cells(self.ny))?.checked_mul(cells(self.nz))
    }

    /// True when any axis is zero.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.nx == 0 || self.ny == 0 || self.nz == 0
    }
}

impl From<[usize; 3]> for Dimensions {
    fn from([nx, ny, nz]: [usize; 3]) -> Self {
        Self::new(nx, ny, nz)
    }
}

impl From<(usize, usize, usize)> for Dimensions {
    fn from((nx, ny, nz): (usize, usize, usize)) -> Self {
        Self::new(nx, ny, nz)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} x {} x {}]", self.nx, self.ny, self.nz)
    }
}

/// Component-wise maximum of every indexed snapshot's dimensions.
///
/// Individual snapshots may be smaller than the whole extent on any axis;
/// they are neither padded nor re-centred.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WholeExtent {
    max: Dimensions,
}

impl WholeExtent {
    /// Empty extent, `(0, 0, 0)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the extent so it covers `dims`.
    pub fn include(&mut self, dims: Dimensions) {
        self.max.nx = self.max.nx.max(dims.nx);
        self.max.ny = self.max.ny.max(dims.ny);
        self.max.nz = self.max.nz.max(dims.nz);
    }

    /// The running maximum.
    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.max
    }

    /// Bounding box with the origin pinned at zero: `[0, nx, 0, ny, 0, nz]`.
    pub fn bounds(&self) -> [usize; 6] {
        [0, self.max.nx, 0, self.max.ny, 0, self.max.nz]
    }

    /// Whether `dims` fits inside the extent on every axis.
    pub fn contains(&self, dims: Dimensions) -> bool {
        dims.nx <= self.max.nx && dims.ny <= self.max.ny && dims.nz <= self.max.nz
    }
}

impl FromIterator<Dimensions> for WholeExtent {
    fn from_iter<I: IntoIterator<Item = Dimensions>>(iter: I) -> Self {
        let mut extent = Self::new();
        for dims in iter {
            extent.include(dims);
        }
        extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_points() {
        let d = Dimensions::new(4, 4, 1);
        assert_eq!(d.num_points(), Some(16));
        assert_eq!(d.num_cells(), Some(9));
        assert_eq!(format!("{}", d), "[4 x 4 x 1]");
    }

    #[test]
    fn test_overflow() {
        let d = Dimensions::new(usize::MAX, 2, 1);
        assert_eq!(d.num_points(), None);
    }

    #[test]
    fn test_whole_extent_is_componentwise_max() {
        let extent: WholeExtent = [
            Dimensions::new(4, 4, 1),
            Dimensions::new(8, 2, 1),
            Dimensions::new(1, 1, 3),
        ]
        .into_iter()
        .collect();
        assert_eq!(extent.dimensions(), Dimensions::new(8, 4, 3));
        assert_eq!(extent.bounds(), [0, 8, 0, 4, 0, 3]);
        assert!(extent.contains(Dimensions::new(4, 4, 1)));
        assert!(!extent.contains(Dimensions::new(9, 1, 1)));
    }

    #[test]
    fn test_empty_extent() {
        let extent = WholeExtent::new();
        assert_eq!(extent.bounds(), [0; 6]);
    }
}
