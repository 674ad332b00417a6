//! Box container constants.

/// Conventional file extension of box archives.
pub const BOX_EXTENSION: &str = "box";

/// Conventional extension of a compressed member.
pub const MEMBER_EXTENSION: &str = "zst";

/// Magic bytes opening every zstd frame.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Size of a tar block; the smallest non-empty tar archive is two of them.
pub const TAR_BLOCK_SIZE: u64 = 512;

/// Upper bound on bytes consumed while reading one header line.
pub const MAX_HEADER_LINE: u64 = 4096;

/// Check whether `data` starts with a zstd frame.
#[inline]
pub fn is_zstd_frame(data: &[u8]) -> bool {
    data.len() >= ZSTD_MAGIC.len() && data[..ZSTD_MAGIC.len()] == ZSTD_MAGIC
}

/// Member name with a trailing `.zst` removed, if present.
pub fn strip_member_extension(name: &str) -> &str {
    name.strip_suffix(MEMBER_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zstd_magic() {
        assert!(is_zstd_frame(&[0x28, 0xB5, 0x2F, 0xFD, 0x00]));
        assert!(!is_zstd_frame(b"# vtk DataFile"));
        assert!(!is_zstd_frame(&[0x28, 0xB5]));
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_member_extension("box_0000_a.vtk.zst"), "box_0000_a.vtk");
        assert_eq!(strip_member_extension("box_0000_a.vtk"), "box_0000_a.vtk");
        assert_eq!(strip_member_extension("zst"), "zst");
    }
}
