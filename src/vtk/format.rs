//! Legacy VTK file format vocabulary.
//!
//! ## File Structure
//!
//! ```text
//! # vtk DataFile Version 3.0          <- magic + version
//! variable ham, level 5, time 1.0     <- free-form title (256 chars max)
//! BINARY                              <- or ASCII
//! DATASET STRUCTURED_POINTS
//! DIMENSIONS 4 4 1
//! ORIGIN 0 0 0
//! SPACING 1 1 1
//! POINT_DATA 16
//! SCALARS ham float 1
//! LOOKUP_TABLE default
//! <16 big-endian floats>
//! ```

/// Lowercased prefix of the first line of every legacy file.
pub const LEGACY_MAGIC: &str = "# vtk datafile";

/// The only dataset kind this reader decodes.
pub const STRUCTURED_POINTS: &str = "structured_points";

/// Encoding of array data following the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileEncoding {
    Ascii,
    Binary,
}

impl FileEncoding {
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "ascii" => Some(Self::Ascii),
            "binary" => Some(Self::Binary),
            _ => None,
        }
    }
}

/// Element type of an array as spelled in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    Bit,
    UnsignedChar,
    Char,
    UnsignedShort,
    Short,
    UnsignedInt,
    Int,
    UnsignedLong,
    Long,
    Float,
    Double,
}

impl DataType {
    /// Parse a type name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "bit" => Self::Bit,
            "unsigned_char" => Self::UnsignedChar,
            "char" | "signed_char" => Self::Char,
            "unsigned_short" => Self::UnsignedShort,
            "short" => Self::Short,
            "unsigned_int" => Self::UnsignedInt,
            "int" => Self::Int,
            "unsigned_long" | "vtktypeuint64" => Self::UnsignedLong,
            "long" | "vtktypeint64" | "vtkidtype" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            _ => return None,
        };
        Some(ty)
    }

    /// Bytes per element in binary files; `bit` is packed and reports 0.
    pub const fn size(self) -> usize {
        match self {
            Self::Bit => 0,
            Self::UnsignedChar | Self::Char => 1,
            Self::UnsignedShort | Self::Short => 2,
            Self::UnsignedInt | Self::Int | Self::Float => 4,
            Self::UnsignedLong | Self::Long | Self::Double => 8,
        }
    }

    /// Binary byte length of `count` elements, `None` on overflow.
    pub fn byte_len(self, count: usize) -> Option<usize> {
        match self {
            Self::Bit => Some(count / 8 + usize::from(count % 8 != 0)),
            _ => count.checked_mul(self.size()),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bit => "bit",
            Self::UnsignedChar => "unsigned_char",
            Self::Char => "char",
            Self::UnsignedShort => "unsigned_short",
            Self::Short => "short",
            Self::UnsignedInt => "unsigned_int",
            Self::Int => "int",
            Self::UnsignedLong => "unsigned_long",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Role of an attribute array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Scalars,
    ColorScalars,
    Vectors,
    Normals,
    Tensors,
    TextureCoordinates,
    GlobalIds,
    PedigreeIds,
    Field,
}

impl AttributeKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalars => "SCALARS",
            Self::ColorScalars => "COLOR_SCALARS",
            Self::Vectors => "VECTORS",
            Self::Normals => "NORMALS",
            Self::Tensors => "TENSORS",
            Self::TextureCoordinates => "TEXTURE_COORDINATES",
            Self::GlobalIds => "GLOBAL_IDS",
            Self::PedigreeIds => "PEDIGREE_IDS",
            Self::Field => "FIELD",
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Decode `%XX` escapes that newer writers use for spaces and other
/// special characters in array names.
pub fn decode_name(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(b) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
