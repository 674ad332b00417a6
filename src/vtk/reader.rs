//! Legacy VTK reader for `STRUCTURED_POINTS` datasets.
//!
//! Header lines are parsed as whitespace-separated words; array payloads
//! are either ASCII numbers or big-endian binary blocks starting right
//! after the line that introduces them.

use byteorder::{BigEndian, ByteOrder};
use glam::DVec3;
use tracing::{trace, warn};

use super::format::*;
use super::grid::{ArrayValues, Attributes, DataArray, StructuredGrid};
use crate::util::{Dimensions, Error, Result};

/// Which parts of a legacy file to decode.
///
/// With a `read_all_*` switch off only the first array of that kind in each
/// attribute section is kept; later ones are still consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Stop after the geometry section (dimensions, origin, spacing).
    pub geometry_only: bool,
    pub read_all_scalars: bool,
    pub read_all_vectors: bool,
    pub read_all_normals: bool,
    pub read_all_tensors: bool,
    pub read_all_fields: bool,
    pub read_all_color_scalars: bool,
    pub read_all_tcoords: bool,
}

impl DecodeOptions {
    /// Geometry only; used to probe snapshot dimensions.
    pub fn geometry() -> Self {
        Self {
            geometry_only: true,
            ..Self::default()
        }
    }

    /// Every attribute array of every kind.
    pub fn full() -> Self {
        Self {
            geometry_only: false,
            read_all_scalars: true,
            read_all_vectors: true,
            read_all_normals: true,
            read_all_tensors: true,
            read_all_fields: true,
            read_all_color_scalars: true,
            read_all_tcoords: true,
        }
    }

    fn read_all(&self, kind: AttributeKind) -> bool {
        match kind {
            AttributeKind::Scalars => self.read_all_scalars,
            AttributeKind::ColorScalars => self.read_all_color_scalars,
            AttributeKind::Vectors => self.read_all_vectors,
            AttributeKind::Normals => self.read_all_normals,
            AttributeKind::Tensors => self.read_all_tensors,
            AttributeKind::TextureCoordinates => self.read_all_tcoords,
            AttributeKind::Field => self.read_all_fields,
            AttributeKind::GlobalIds | AttributeKind::PedigreeIds => false,
        }
    }
}

/// Decode a legacy VTK payload held in memory.
pub fn read_legacy(payload: &[u8], options: &DecodeOptions) -> Result<StructuredGrid> {
    LegacyParser::new(payload, options).parse()
}

// ============================================================================
// Scanner
// ============================================================================

struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Raw bytes up to the next newline; the newline is consumed.
    fn line_bytes(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        let len = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
        self.pos += (len + 1).min(rest.len());
        let line = &rest[..len];
        line.strip_suffix(b"\r").unwrap_or(line)
    }

    /// Remainder of the current line as text.
    fn rest_of_line(&mut self) -> Result<&'a str> {
        let line = self.line_bytes();
        std::str::from_utf8(line).map_err(|_| Error::decode("non-text bytes in header line"))
    }

    /// Next whitespace-delimited word, `None` at end of input.
    fn try_word(&mut self) -> Result<Option<&'a str>> {
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos == self.data.len() {
            return Ok(None);
        }
        let start = self.pos;
        while self.pos < self.data.len() && !self.data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        std::str::from_utf8(&self.data[start..self.pos])
            .map(Some)
            .map_err(|_| Error::decode(format!("non-text bytes at offset {} where a keyword was expected", start)))
    }

    fn word(&mut self, what: &str) -> Result<&'a str> {
        self.try_word()?
            .ok_or_else(|| Error::decode(format!("unexpected end of data, expected {}", what)))
    }

    fn parse<T: std::str::FromStr>(&mut self, what: &str) -> Result<T> {
        let word = self.word(what)?;
        word.parse()
            .map_err(|_| Error::decode(format!("invalid {}: {:?}", what, word)))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::decode(format!(
                "binary block of {} bytes exceeds the {} bytes left",
                len,
                self.remaining()
            )));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}

fn parse_param<T: std::str::FromStr>(value: Option<&str>, what: &str) -> Result<T> {
    let value = value.ok_or_else(|| Error::decode(format!("missing {}", what)))?;
    value
        .parse()
        .map_err(|_| Error::decode(format!("invalid {}: {:?}", what, value)))
}

fn parse_type(value: Option<&str>) -> Result<DataType> {
    let value = value.ok_or_else(|| Error::decode("missing data type"))?;
    DataType::parse(value).ok_or_else(|| Error::decode(format!("unsupported data type {:?}", value)))
}

// ============================================================================
// Parser
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Point,
    Cell,
}

struct LegacyParser<'a> {
    sc: Scanner<'a>,
    options: &'a DecodeOptions,
    encoding: FileEncoding,
    grid: StructuredGrid,
}

impl<'a> LegacyParser<'a> {
    fn new(data: &'a [u8], options: &'a DecodeOptions) -> Self {
        Self {
            sc: Scanner::new(data),
            options,
            encoding: FileEncoding::Ascii,
            grid: StructuredGrid::default(),
        }
    }

    fn parse(mut self) -> Result<StructuredGrid> {
        self.read_header()?;
        let section = self.read_geometry()?;
        if self.options.geometry_only {
            return Ok(self.grid);
        }
        if let Some((section, n)) = section {
            self.read_attributes(section, n)?;
        }
        Ok(self.grid)
    }

    fn read_header(&mut self) -> Result<()> {
        let magic = self.sc.line_bytes().to_ascii_lowercase();
        if !magic.starts_with(LEGACY_MAGIC.as_bytes()) {
            return Err(Error::decode("missing '# vtk DataFile' magic line"));
        }
        let version = String::from_utf8_lossy(&magic[LEGACY_MAGIC.len()..]);
        trace!(version = %version.trim(), "legacy vtk header");

        self.grid.title = String::from_utf8_lossy(self.sc.line_bytes()).trim_end().to_string();

        let encoding = self.sc.word("file encoding")?;
        self.encoding = FileEncoding::parse(encoding)
            .ok_or_else(|| Error::decode(format!("unknown file encoding {:?}", encoding)))?;

        let keyword = self.sc.word("DATASET")?;
        if !keyword.eq_ignore_ascii_case("dataset") {
            return Err(Error::decode(format!("expected DATASET, found {:?}", keyword)));
        }
        let kind = self.sc.word("dataset type")?;
        if !kind.eq_ignore_ascii_case(STRUCTURED_POINTS) {
            return Err(Error::decode(format!("unsupported dataset type {}", kind)));
        }
        Ok(())
    }

    /// Read the geometry block; returns the first attribute section found.
    fn read_geometry(&mut self) -> Result<Option<(Section, usize)>> {
        let mut dimensions = None;
        let mut section = None;

        while let Some(keyword) = self.sc.try_word()? {
            match keyword.to_ascii_lowercase().as_str() {
                "dimensions" => {
                    let nx = self.sc.parse("x dimension")?;
                    let ny = self.sc.parse("y dimension")?;
                    let nz = self.sc.parse("z dimension")?;
                    dimensions = Some(Dimensions::new(nx, ny, nz));
                }
                "origin" => self.grid.origin = self.read_vec3("origin")?,
                "spacing" | "aspect_ratio" => self.grid.spacing = self.read_vec3("spacing")?,
                "field" => {
                    let arrays = self.read_field_block()?;
                    if !self.options.geometry_only {
                        self.grid.field_data.extend(arrays);
                    }
                }
                "metadata" => self.skip_metadata(),
                "point_data" => {
                    section = Some((Section::Point, self.sc.parse("POINT_DATA count")?));
                    break;
                }
                "cell_data" => {
                    section = Some((Section::Cell, self.sc.parse("CELL_DATA count")?));
                    break;
                }
                other => {
                    return Err(Error::decode(format!("unexpected keyword {:?} in STRUCTURED_POINTS", other)));
                }
            }
        }

        self.grid.dimensions = dimensions.ok_or_else(|| Error::decode("missing DIMENSIONS"))?;
        Ok(section)
    }

    fn read_vec3(&mut self, what: &str) -> Result<DVec3> {
        Ok(DVec3::new(self.sc.parse(what)?, self.sc.parse(what)?, self.sc.parse(what)?))
    }

    fn read_attributes(&mut self, mut section: Section, n: usize) -> Result<()> {
        self.start_section(section, n);

        while let Some(keyword) = self.sc.try_word()? {
            let keyword = keyword.to_ascii_lowercase();
            let arrays = match keyword.as_str() {
                "point_data" | "cell_data" => {
                    section = if keyword == "point_data" { Section::Point } else { Section::Cell };
                    let n = self.sc.parse("attribute count")?;
                    self.start_section(section, n);
                    continue;
                }
                "metadata" => {
                    self.skip_metadata();
                    continue;
                }
                "lookup_table" => {
                    self.skip_lookup_table()?;
                    continue;
                }
                "scalars" => vec![self.read_scalars(self.tuples(section))?],
                "color_scalars" => vec![self.read_color_scalars(self.tuples(section))?],
                "vectors" => vec![self.read_fixed(AttributeKind::Vectors, 3, self.tuples(section))?],
                "normals" => vec![self.read_fixed(AttributeKind::Normals, 3, self.tuples(section))?],
                "tensors" => vec![self.read_fixed(AttributeKind::Tensors, 9, self.tuples(section))?],
                "tensors6" => vec![self.read_fixed(AttributeKind::Tensors, 6, self.tuples(section))?],
                "global_ids" => vec![self.read_fixed(AttributeKind::GlobalIds, 1, self.tuples(section))?],
                "pedigree_ids" => vec![self.read_fixed(AttributeKind::PedigreeIds, 1, self.tuples(section))?],
                "texture_coordinates" => vec![self.read_tcoords(self.tuples(section))?],
                "field" => self.read_field_block()?,
                other => {
                    return Err(Error::decode(format!("unexpected keyword {:?} in attribute data", other)));
                }
            };

            let options = self.options;
            let attrs = self.section_mut(section);
            // FIELD blocks are kept or dropped as a whole.
            let had_field = attrs.has_kind(AttributeKind::Field);
            for array in arrays {
                let seen = match array.kind {
                    AttributeKind::Field => had_field,
                    kind => attrs.has_kind(kind),
                };
                if seen && !options.read_all(array.kind) {
                    trace!(name = %array.name, kind = %array.kind, "skipping additional array");
                    continue;
                }
                if array.num_tuples() != attrs.num_tuples {
                    warn!(
                        name = %array.name,
                        tuples = array.num_tuples(),
                        expected = attrs.num_tuples,
                        "attribute array size differs from its section"
                    );
                }
                attrs.push(array);
            }
        }
        Ok(())
    }

    fn start_section(&mut self, section: Section, n: usize) {
        let expected = match section {
            Section::Point => self.grid.dimensions.num_points(),
            Section::Cell => self.grid.dimensions.num_cells(),
        };
        if expected != Some(n) {
            warn!(?section, declared = n, ?expected, "attribute count does not match the grid");
        }
        let attrs = self.section_mut(section);
        if attrs.is_empty() {
            *attrs = Attributes::new(n);
        } else {
            attrs.num_tuples = n;
        }
    }

    fn tuples(&self, section: Section) -> usize {
        match section {
            Section::Point => self.grid.point_data.num_tuples,
            Section::Cell => self.grid.cell_data.num_tuples,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Attributes {
        match section {
            Section::Point => &mut self.grid.point_data,
            Section::Cell => &mut self.grid.cell_data,
        }
    }

    // ------------------------------------------------------------------------
    // Attribute arrays
    // ------------------------------------------------------------------------

    fn read_scalars(&mut self, n: usize) -> Result<DataArray> {
        let mut params = self.sc.rest_of_line()?.split_whitespace();
        let name = decode_name(params.next().ok_or_else(|| Error::decode("SCALARS without a name"))?);
        let ty = parse_type(params.next())?;
        let num_components = match params.next() {
            Some(c) => parse_param(Some(c), "SCALARS component count")?,
            None => 1,
        };
        if !(1..=4).contains(&num_components) {
            return Err(Error::decode(format!("SCALARS {} has {} components", name, num_components)));
        }

        let keyword = self.sc.word("LOOKUP_TABLE")?;
        if !keyword.eq_ignore_ascii_case("lookup_table") {
            return Err(Error::decode(format!("SCALARS {} must be followed by LOOKUP_TABLE", name)));
        }
        self.sc.rest_of_line()?;

        let values = self.read_values(ty, count(n, num_components)?)?;
        Ok(DataArray {
            name,
            kind: AttributeKind::Scalars,
            num_components,
            values,
        })
    }

    fn read_color_scalars(&mut self, n: usize) -> Result<DataArray> {
        let mut params = self.sc.rest_of_line()?.split_whitespace();
        let name = decode_name(params.next().ok_or_else(|| Error::decode("COLOR_SCALARS without a name"))?);
        let num_components: usize = parse_param(params.next(), "COLOR_SCALARS component count")?;
        let ty = match self.encoding {
            FileEncoding::Binary => DataType::UnsignedChar,
            FileEncoding::Ascii => DataType::Float,
        };
        let values = self.read_values(ty, count(n, num_components)?)?;
        Ok(DataArray {
            name,
            kind: AttributeKind::ColorScalars,
            num_components,
            values,
        })
    }

    /// Arrays with a fixed component count: `KEYWORD name type`.
    fn read_fixed(&mut self, kind: AttributeKind, num_components: usize, n: usize) -> Result<DataArray> {
        let mut params = self.sc.rest_of_line()?.split_whitespace();
        let name = decode_name(params.next().ok_or_else(|| Error::decode(format!("{} without a name", kind)))?);
        let ty = parse_type(params.next())?;
        let values = self.read_values(ty, count(n, num_components)?)?;
        Ok(DataArray {
            name,
            kind,
            num_components,
            values,
        })
    }

    fn read_tcoords(&mut self, n: usize) -> Result<DataArray> {
        let mut params = self.sc.rest_of_line()?.split_whitespace();
        let name = decode_name(params.next().ok_or_else(|| Error::decode("TEXTURE_COORDINATES without a name"))?);
        let num_components: usize = parse_param(params.next(), "texture coordinate dimension")?;
        if !(1..=3).contains(&num_components) {
            return Err(Error::decode(format!("TEXTURE_COORDINATES {} has dimension {}", name, num_components)));
        }
        let ty = parse_type(params.next())?;
        let values = self.read_values(ty, count(n, num_components)?)?;
        Ok(DataArray {
            name,
            kind: AttributeKind::TextureCoordinates,
            num_components,
            values,
        })
    }

    /// `FIELD name numArrays` followed by `arrayName numComponents numTuples type` blocks.
    fn read_field_block(&mut self) -> Result<Vec<DataArray>> {
        let mut params = self.sc.rest_of_line()?.split_whitespace();
        let _field_name = params.next();
        let num_arrays: usize = parse_param(params.next(), "FIELD array count")?;

        let mut arrays = Vec::with_capacity(num_arrays.min(64));
        let mut read = 0;
        while read < num_arrays {
            let name = self.sc.word("field array name")?;
            if name.eq_ignore_ascii_case("metadata") {
                self.skip_metadata();
                continue;
            }
            read += 1;
            if name == "NULL_ARRAY" {
                self.sc.rest_of_line()?;
                continue;
            }
            let name = decode_name(name);
            let mut params = self.sc.rest_of_line()?.split_whitespace();
            let num_components: usize = parse_param(params.next(), "field component count")?;
            let num_tuples: usize = parse_param(params.next(), "field tuple count")?;
            let ty = parse_type(params.next())?;
            let values = self.read_values(ty, count(num_tuples, num_components)?)?;
            arrays.push(DataArray {
                name,
                kind: AttributeKind::Field,
                num_components,
                values,
            });
        }
        Ok(arrays)
    }

    fn skip_lookup_table(&mut self) -> Result<()> {
        let mut params = self.sc.rest_of_line()?.split_whitespace();
        let _name = params.next();
        let size: usize = parse_param(params.next(), "LOOKUP_TABLE size")?;
        let ty = match self.encoding {
            FileEncoding::Binary => DataType::UnsignedChar,
            FileEncoding::Ascii => DataType::Float,
        };
        self.read_values(ty, count(size, 4)?)?;
        Ok(())
    }

    /// `METADATA` blocks end at the first blank line.
    fn skip_metadata(&mut self) {
        self.sc.line_bytes();
        while self.sc.remaining() > 0 {
            if self.sc.line_bytes().iter().all(u8::is_ascii_whitespace) {
                break;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------------

    fn read_values(&mut self, ty: DataType, count: usize) -> Result<ArrayValues> {
        match self.encoding {
            FileEncoding::Binary => self.read_binary(ty, count),
            FileEncoding::Ascii => self.read_ascii(ty, count),
        }
    }

    fn read_binary(&mut self, ty: DataType, count: usize) -> Result<ArrayValues> {
        let len = ty
            .byte_len(count)
            .ok_or_else(|| Error::decode(format!("{} {} values overflow", count, ty)))?;
        let bytes = self.sc.take(len)?;

        Ok(match ty {
            DataType::Bit => ArrayValues::UInt8(
                (0..count).map(|i| (bytes[i / 8] >> (7 - i % 8)) & 1).collect(),
            ),
            DataType::UnsignedChar => ArrayValues::UInt8(bytes.to_vec()),
            DataType::Char => ArrayValues::Int8(bytes.iter().map(|&b| b as i8).collect()),
            DataType::UnsignedShort => {
                let mut v = vec![0u16; count];
                BigEndian::read_u16_into(bytes, &mut v);
                ArrayValues::UInt16(v)
            }
            DataType::Short => {
                let mut v = vec![0i16; count];
                BigEndian::read_i16_into(bytes, &mut v);
                ArrayValues::Int16(v)
            }
            DataType::UnsignedInt => {
                let mut v = vec![0u32; count];
                BigEndian::read_u32_into(bytes, &mut v);
                ArrayValues::UInt32(v)
            }
            DataType::Int => {
                let mut v = vec![0i32; count];
                BigEndian::read_i32_into(bytes, &mut v);
                ArrayValues::Int32(v)
            }
            DataType::UnsignedLong => {
                let mut v = vec![0u64; count];
                BigEndian::read_u64_into(bytes, &mut v);
                ArrayValues::UInt64(v)
            }
            DataType::Long => {
                let mut v = vec![0i64; count];
                BigEndian::read_i64_into(bytes, &mut v);
                ArrayValues::Int64(v)
            }
            DataType::Float => {
                let mut v = vec![0f32; count];
                BigEndian::read_f32_into(bytes, &mut v);
                ArrayValues::Float32(v)
            }
            DataType::Double => {
                let mut v = vec![0f64; count];
                BigEndian::read_f64_into(bytes, &mut v);
                ArrayValues::Float64(v)
            }
        })
    }

    fn read_ascii(&mut self, ty: DataType, count: usize) -> Result<ArrayValues> {
        // Every ASCII value takes at least one byte plus a separator.
        if count > self.sc.remaining() {
            return Err(Error::decode(format!(
                "{} ASCII values cannot fit in the {} bytes left",
                count,
                self.sc.remaining()
            )));
        }

        Ok(match ty {
            DataType::Bit | DataType::UnsignedChar => ArrayValues::UInt8(self.ascii(count)?),
            DataType::Char => ArrayValues::Int8(self.ascii(count)?),
            DataType::UnsignedShort => ArrayValues::UInt16(self.ascii(count)?),
            DataType::Short => ArrayValues::Int16(self.ascii(count)?),
            DataType::UnsignedInt => ArrayValues::UInt32(self.ascii(count)?),
            DataType::Int => ArrayValues::Int32(self.ascii(count)?),
            DataType::UnsignedLong => ArrayValues::UInt64(self.ascii(count)?),
            DataType::Long => ArrayValues::Int64(self.ascii(count)?),
            DataType::Float => ArrayValues::Float32(self.ascii(count)?),
            DataType::Double => ArrayValues::Float64(self.ascii(count)?),
        })
    }

    fn ascii<T: std::str::FromStr>(&mut self, count: usize) -> Result<Vec<T>> {
        (0..count).map(|_| self.sc.parse("array value")).collect()
    }
}

fn count(tuples: usize, components: usize) -> Result<usize> {
    tuples
        .checked_mul(components)
        .ok_or_else(|| Error::decode(format!("{} tuples of {} components overflow", tuples, components)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Binary structured-points file with one float scalar array.
    fn binary_payload(dims: [usize; 3], values: &[f32]) -> Vec<u8> {
        let n = dims[0] * dims[1] * dims[2];
        let mut out = format!(
            "# vtk DataFile Version 3.0\nvariable ham, level 0, time 1.5\nBINARY\n\
             DATASET STRUCTURED_POINTS\nDIMENSIONS {} {} {}\nORIGIN 0 0 0\nSPACING 0.5 0.5 1\n\
             POINT_DATA {}\nSCALARS ham float 1\nLOOKUP_TABLE default\n",
            dims[0], dims[1], dims[2], n
        )
        .into_bytes();
        for v in values {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.push(b'\n');
        out
    }

    #[test]
    fn test_binary_scalars() {
        let values: Vec<f32> = (0..8).map(|i| i as f32 * 0.25).collect();
        let payload = binary_payload([4, 2, 1], &values);
        let grid = read_legacy(&payload, &DecodeOptions::full()).unwrap();

        assert_eq!(grid.title, "variable ham, level 0, time 1.5");
        assert_eq!(grid.dimensions, Dimensions::new(4, 2, 1));
        assert_eq!(grid.spacing, DVec3::new(0.5, 0.5, 1.0));
        let ham = grid.point_data.get("ham").unwrap();
        assert_eq!(ham.values, ArrayValues::Float32(values));
    }

    #[test]
    fn test_binary_scalars_starting_with_whitespace_bytes() {
        // 0x20 / 0x0a leading bytes must not be mistaken for separators.
        let values = [f32::from_be_bytes([0x20, 0x0a, 0x20, 0x0a]), 1.0];
        let payload = binary_payload([2, 1, 1], &values);
        let grid = read_legacy(&payload, &DecodeOptions::full()).unwrap();
        assert_eq!(grid.point_data.scalars().unwrap().values, ArrayValues::Float32(values.to_vec()));
    }

    #[test]
    fn test_geometry_only_ignores_attribute_garbage() {
        let mut payload = binary_payload([3, 3, 2], &[0.0; 18]);
        payload.truncate(payload.len() - 40);
        let grid = read_legacy(&payload, &DecodeOptions::geometry()).unwrap();
        assert_eq!(grid.dimensions, Dimensions::new(3, 3, 2));
        assert!(grid.point_data.is_empty());
        assert!(matches!(read_legacy(&payload, &DecodeOptions::full()), Err(Error::Decode(_))));
    }

    #[test]
    fn test_ascii_all_kinds() {
        let text = "\
# vtk DataFile Version 2.0
ascii sample
ASCII
DATASET STRUCTURED_POINTS
FIELD FieldData 1
TIME 1 1 double
2.5
DIMENSIONS 2 1 1
ASPECT_RATIO 1 1 1
ORIGIN 1 2 3
POINT_DATA 2
SCALARS density double
LOOKUP_TABLE default
1.0 2.0
SCALARS pressure int 1
LOOKUP_TABLE default
7 8
VECTORS vel float
1 0 0 0 1 0
NORMALS n float
0 0 1 0 0 1
TENSORS stress double
1 0 0 0 1 0 0 0 1
1 0 0 0 1 0 0 0 1
TEXTURE_COORDINATES uv 2 float
0 0 1 1
COLOR_SCALARS rgb 3
1 0 0 0 1 0
FIELD extras 2
temp%20K 1 2 float
300 301
flags 1 2 unsigned_char
0 1
CELL_DATA 1
SCALARS cellid int
LOOKUP_TABLE default
42
";
        let grid = read_legacy(text.as_bytes(), &DecodeOptions::full()).unwrap();
        assert_eq!(grid.origin, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(grid.field_data.len(), 1);
        assert_eq!(grid.field_data[0].values, ArrayValues::Float64(vec![2.5]));

        let pd = &grid.point_data;
        assert_eq!(pd.num_tuples, 2);
        assert_eq!(pd.of_kind(AttributeKind::Scalars).count(), 2);
        assert_eq!(pd.get("pressure").unwrap().values, ArrayValues::Int32(vec![7, 8]));
        assert_eq!(pd.vectors().unwrap().num_tuples(), 2);
        assert_eq!(pd.get("stress").unwrap().num_components, 9);
        assert_eq!(pd.get("uv").unwrap().num_components, 2);
        assert_eq!(pd.get("rgb").unwrap().values.type_name(), "float");
        assert_eq!(pd.get("temp K").unwrap().values, ArrayValues::Float32(vec![300.0, 301.0]));
        assert_eq!(pd.get("flags").unwrap().values, ArrayValues::UInt8(vec![0, 1]));

        assert_eq!(grid.cell_data.num_tuples, 1);
        assert_eq!(grid.cell_data.scalars().unwrap().values, ArrayValues::Int32(vec![42]));
    }

    #[test]
    fn test_default_options_keep_first_scalars_only() {
        let text = "\
# vtk DataFile Version 3.0
t
ASCII
DATASET STRUCTURED_POINTS
DIMENSIONS 1 1 1
POINT_DATA 1
SCALARS a float
LOOKUP_TABLE default
1
SCALARS b float
LOOKUP_TABLE default
2
VECTORS v float
1 2 3
";
        let grid = read_legacy(text.as_bytes(), &DecodeOptions::default()).unwrap();
        assert!(grid.point_data.get("a").is_some());
        assert!(grid.point_data.get("b").is_none());
        assert!(grid.point_data.get("v").is_some());
    }

    #[test]
    fn test_binary_color_scalars_and_lookup_table() {
        let mut payload = b"# vtk DataFile Version 3.0\nc\nBINARY\nDATASET STRUCTURED_POINTS\n\
DIMENSIONS 2 1 1\nPOINT_DATA 2\nSCALARS s short\nLOOKUP_TABLE lut\n"
            .to_vec();
        payload.extend_from_slice(&(-3i16).to_be_bytes());
        payload.extend_from_slice(&(5i16).to_be_bytes());
        payload.extend_from_slice(b"\nLOOKUP_TABLE lut 1\n");
        payload.extend_from_slice(&[255, 0, 0, 255]);
        payload.extend_from_slice(b"\nCOLOR_SCALARS rgba 4\n");
        payload.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        payload.extend_from_slice(b"\nMETADATA\nINFORMATION 0\n\n");

        let grid = read_legacy(&payload, &DecodeOptions::full()).unwrap();
        assert_eq!(grid.point_data.get("s").unwrap().values, ArrayValues::Int16(vec![-3, 5]));
        let rgba = grid.point_data.get("rgba").unwrap();
        assert_eq!(rgba.kind, AttributeKind::ColorScalars);
        assert_eq!(rgba.values, ArrayValues::UInt8(vec![1, 2, 3, 4, 5, 6, 7, 8]));
    }

    #[test]
    fn test_rejections() {
        let cases: [&[u8]; 5] = [
            b"not a vtk file\n",
            b"# vtk DataFile Version 3.0\nt\nXML\nDATASET STRUCTURED_POINTS\n",
            b"# vtk DataFile Version 3.0\nt\nASCII\nDATASET POLYDATA\nPOINTS 0 float\n",
            b"# vtk DataFile Version 3.0\nt\nASCII\nDATASET STRUCTURED_POINTS\nORIGIN 0 0 0\n",
            b"# vtk DataFile Version 3.0\nt\nBINARY\nDATASET STRUCTURED_POINTS\nDIMENSIONS 1000 1000 1000\n\
POINT_DATA 1000000000\nSCALARS s double\nLOOKUP_TABLE default\n\x00\x00",
        ];
        for payload in cases {
            assert!(
                matches!(read_legacy(payload, &DecodeOptions::full()), Err(Error::Decode(_))),
                "{:?} should be rejected",
                String::from_utf8_lossy(payload)
            );
        }
    }
}
