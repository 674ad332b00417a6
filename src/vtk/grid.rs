//! Decoded structured-points grids and their attribute arrays.

use glam::DVec3;
use smallvec::SmallVec;

use super::format::{AttributeKind, DataType};
use crate::util::Dimensions;

/// Typed storage of array values.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayValues {
    UInt8(Vec<u8>),
    Int8(Vec<i8>),
    UInt16(Vec<u16>),
    Int16(Vec<i16>),
    UInt32(Vec<u32>),
    Int32(Vec<i32>),
    UInt64(Vec<u64>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl ArrayValues {
    /// Number of scalar elements (tuples times components).
    pub fn len(&self) -> usize {
        match self {
            Self::UInt8(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index` widened to `f64`.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        Some(match self {
            Self::UInt8(v) => *v.get(index)? as f64,
            Self::Int8(v) => *v.get(index)? as f64,
            Self::UInt16(v) => *v.get(index)? as f64,
            Self::Int16(v) => *v.get(index)? as f64,
            Self::UInt32(v) => *v.get(index)? as f64,
            Self::Int32(v) => *v.get(index)? as f64,
            Self::UInt64(v) => *v.get(index)? as f64,
            Self::Int64(v) => *v.get(index)? as f64,
            Self::Float32(v) => *v.get(index)? as f64,
            Self::Float64(v) => *v.get(index)?,
        })
    }

    /// All elements widened to `f64`.
    pub fn to_f64(&self) -> Vec<f64> {
        (0..self.len()).filter_map(|i| self.get_f64(i)).collect()
    }

    /// Storage type name.
    pub fn type_name(&self) -> &'static str {
        let ty = match self {
            Self::UInt8(_) => DataType::UnsignedChar,
            Self::Int8(_) => DataType::Char,
            Self::UInt16(_) => DataType::UnsignedShort,
            Self::Int16(_) => DataType::Short,
            Self::UInt32(_) => DataType::UnsignedInt,
            Self::Int32(_) => DataType::Int,
            Self::UInt64(_) => DataType::UnsignedLong,
            Self::Int64(_) => DataType::Long,
            Self::Float32(_) => DataType::Float,
            Self::Float64(_) => DataType::Double,
        };
        ty.name()
    }
}

/// A named attribute array.
#[derive(Clone, Debug, PartialEq)]
pub struct DataArray {
    pub name: String,
    pub kind: AttributeKind,
    pub num_components: usize,
    pub values: ArrayValues,
}

impl DataArray {
    /// Number of tuples.
    pub fn num_tuples(&self) -> usize {
        if self.num_components == 0 {
            0
        } else {
            self.values.len() / self.num_components
        }
    }

    /// Component `component` of tuple `tuple`.
    pub fn component(&self, tuple: usize, component: usize) -> Option<f64> {
        if component >= self.num_components {
            return None;
        }
        self.values.get_f64(tuple * self.num_components + component)
    }

    /// Minimum and maximum over all finite elements.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values
            .to_f64()
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Arrays attached to points or cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    /// Tuple count declared by `POINT_DATA` / `CELL_DATA`.
    pub num_tuples: usize,
    arrays: SmallVec<[DataArray; 4]>,
}

impl Attributes {
    pub fn new(num_tuples: usize) -> Self {
        Self {
            num_tuples,
            arrays: SmallVec::new(),
        }
    }

    pub fn push(&mut self, array: DataArray) {
        self.arrays.push(array);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn arrays(&self) -> &[DataArray] {
        &self.arrays
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataArray> {
        self.arrays.iter()
    }

    /// Array by name.
    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.arrays.iter().find(|a| a.name == name)
    }

    /// Whether an array of `kind` is already present.
    pub fn has_kind(&self, kind: AttributeKind) -> bool {
        self.arrays.iter().any(|a| a.kind == kind)
    }

    /// Arrays of a given kind in file order.
    pub fn of_kind(&self, kind: AttributeKind) -> impl Iterator<Item = &DataArray> + '_ {
        self.arrays.iter().filter(move |a| a.kind == kind)
    }

    /// Active scalars (the first `SCALARS` array).
    pub fn scalars(&self) -> Option<&DataArray> {
        self.of_kind(AttributeKind::Scalars).next()
    }

    /// Active vectors (the first `VECTORS` array).
    pub fn vectors(&self) -> Option<&DataArray> {
        self.of_kind(AttributeKind::Vectors).next()
    }
}

/// A uniform grid with its attribute arrays.
///
/// The default value is the empty grid returned for unmatched time
/// queries: no points, zero origin, unit spacing, no arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuredGrid {
    /// Title line of the source file.
    pub title: String,
    pub dimensions: Dimensions,
    pub origin: DVec3,
    pub spacing: DVec3,
    /// Dataset-level field arrays.
    pub field_data: Vec<DataArray>,
    pub point_data: Attributes,
    pub cell_data: Attributes,
}

impl Default for StructuredGrid {
    fn default() -> Self {
        Self {
            title: String::new(),
            dimensions: Dimensions::default(),
            origin: DVec3::ZERO,
            spacing: DVec3::ONE,
            field_data: Vec::new(),
            point_data: Attributes::default(),
            cell_data: Attributes::default(),
        }
    }
}

impl StructuredGrid {
    /// The empty grid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True for a grid without points or arrays.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
            && self.field_data.is_empty()
            && self.point_data.is_empty()
            && self.cell_data.is_empty()
    }

    pub fn num_points(&self) -> usize {
        self.dimensions.num_points().unwrap_or(0)
    }

    pub fn num_cells(&self) -> usize {
        self.dimensions.num_cells().unwrap_or(0)
    }

    /// Physical bounds `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    pub fn bounds(&self) -> [f64; 6] {
        let d = self.dimensions;
        let steps = DVec3::new(
            d.nx.saturating_sub(1) as f64,
            d.ny.saturating_sub(1) as f64,
            d.nz.saturating_sub(1) as f64,
        );
        let far = self.origin + steps * self.spacing;
        let lo = self.origin.min(far);
        let hi = self.origin.max(far);
        [lo.x, hi.x, lo.y, hi.y, lo.z, hi.z]
    }

    /// Position of point `(i, j, k)`.
    pub fn point(&self, i: usize, j: usize, k: usize) -> DVec3 {
        self.origin + DVec3::new(i as f64, j as f64, k as f64) * self.spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalars(values: Vec<f32>) -> DataArray {
        DataArray {
            name: "ham".into(),
            kind: AttributeKind::Scalars,
            num_components: 1,
            values: ArrayValues::Float32(values),
        }
    }

    #[test]
    fn test_empty_grid() {
        let grid = StructuredGrid::empty();
        assert!(grid.is_empty());
        assert_eq!(grid.num_points(), 0);
        assert_eq!(grid.spacing, DVec3::ONE);
    }

    #[test]
    fn test_bounds() {
        let grid = StructuredGrid {
            dimensions: Dimensions::new(5, 3, 1),
            origin: DVec3::new(-1.0, 0.0, 2.0),
            spacing: DVec3::new(0.5, 2.0, 1.0),
            ..Default::default()
        };
        assert_eq!(grid.bounds(), [-1.0, 1.0, 0.0, 4.0, 2.0, 2.0]);
        assert_eq!(grid.point(2, 1, 0), DVec3::new(0.0, 2.0, 2.0));
    }

    #[test]
    fn test_array_range_and_components() {
        let mut a = scalars(vec![3.0, -1.0, f32::NAN, 7.5]);
        assert_eq!(a.range(), Some((-1.0, 7.5)));
        a.num_components = 2;
        assert_eq!(a.num_tuples(), 2);
        assert_eq!(a.component(1, 1), Some(7.5));
        assert_eq!(a.component(0, 2), None);
    }

    #[test]
    fn test_attribute_lookup() {
        let mut attrs = Attributes::new(4);
        attrs.push(scalars(vec![0.0; 4]));
        assert!(attrs.has_kind(AttributeKind::Scalars));
        assert!(attrs.get("ham").is_some());
        assert!(attrs.vectors().is_none());
        assert_eq!(attrs.scalars().unwrap().values.type_name(), "float");
    }
}
