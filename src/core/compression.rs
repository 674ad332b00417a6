//! Zstd decompression of member payloads.
//!
//! Two access patterns are needed: a short streaming read of the leading
//! text lines (the snapshot header), and a full decompression into memory.
//! Each call opens its own decoder; a stream that has been partially read
//! is never reused.

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read};

use crate::archive::{is_zstd_frame, MAX_HEADER_LINE};
use crate::util::{Error, Result};

/// Open a decompressing reader over a member payload.
///
/// Payloads that do not start with a zstd frame are read as-is.
pub fn open_stream<'a>(data: &'a [u8]) -> Result<Box<dyn Read + 'a>> {
    if !is_zstd_frame(data) {
        return Ok(Box::new(data));
    }
    let decoder = zstd::stream::read::Decoder::with_buffer(data)
        .map_err(zstd_error)?;
    Ok(Box::new(decoder))
}

/// Decompress just enough of `data` to return its first `count` text lines.
///
/// Lines are decoded as ASCII with every non-ASCII byte dropped, and the
/// line terminator is removed. Fewer lines are returned if the payload ends
/// early. Each line is capped at [`MAX_HEADER_LINE`] bytes.
pub fn read_header_lines(data: &[u8], count: usize) -> Result<Vec<String>> {
    let mut reader = BufReader::new(open_stream(data)?);
    let mut lines = Vec::with_capacity(count);
    let mut buf = Vec::new();

    for _ in 0..count {
        buf.clear();
        (&mut reader)
            .take(MAX_HEADER_LINE)
            .read_until(b'\n', &mut buf)
            .map_err(zstd_error)?;
        if buf.is_empty() {
            break;
        }
        if buf.last() != Some(&b'\n') {
            discard_line(&mut reader)?;
        }
        lines.push(ascii_lossy(&buf));
    }

    Ok(lines)
}

/// Consume the remainder of an over-long line, up to and including `\n`.
fn discard_line<R: BufRead>(reader: &mut R) -> Result<()> {
    loop {
        let available = reader.fill_buf().map_err(zstd_error)?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

fn zstd_error(e: std::io::Error) -> Error {
    Error::decode(format!("zstd: {}", e))
}

/// Fully decompress a member payload.
pub fn decompress(data: &[u8]) -> Result<Cow<'_, [u8]>> {
    if !is_zstd_frame(data) {
        return Ok(Cow::Borrowed(data));
    }
    zstd::stream::decode_all(data).map(Cow::Owned).map_err(zstd_error)
}

/// ASCII view of a raw line, dropping undecodable bytes and the terminator.
fn ascii_lossy(bytes: &[u8]) -> String {
    let text: String = bytes
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .collect();
    text.trim_end_matches(['\n', '\r']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &[u8] = b"# vtk DataFile Version 3.0\nvariable ham, level 5, time  1.0e+01\nBINARY\n";

    #[test]
    fn test_header_lines_from_zstd() {
        let compressed = zstd::encode_all(PAYLOAD, 3).unwrap();
        let lines = read_header_lines(&compressed, 2).unwrap();
        assert_eq!(lines, vec![
            "# vtk DataFile Version 3.0".to_string(),
            "variable ham, level 5, time  1.0e+01".to_string(),
        ]);
    }

    #[test]
    fn test_header_lines_drop_non_ascii() {
        let raw = b"marker\xff\xfe\r\nvar\xc3\xa9iable x, level 1, time 0\n";
        let compressed = zstd::encode_all(&raw[..], 1).unwrap();
        let lines = read_header_lines(&compressed, 2).unwrap();
        assert_eq!(lines[0], "marker");
        assert_eq!(lines[1], "variable x, level 1, time 0");
    }

    #[test]
    fn test_short_payload_returns_fewer_lines() {
        let compressed = zstd::encode_all(&b"only one line"[..], 1).unwrap();
        let lines = read_header_lines(&compressed, 2).unwrap();
        assert_eq!(lines, vec!["only one line".to_string()]);
    }

    #[test]
    fn test_long_marker_line_is_skipped_whole() {
        let mut raw = vec![b'x'; 5000];
        raw.extend_from_slice(b"\nvariable ham, level 0, time 1.0\nBINARY\n");
        let compressed = zstd::encode_all(&raw[..], 3).unwrap();
        let lines = read_header_lines(&compressed, 2).unwrap();
        assert_eq!(lines[0].len(), MAX_HEADER_LINE as usize);
        assert_eq!(lines[1], "variable ham, level 0, time 1.0");
    }

    #[test]
    fn test_decompress_roundtrip_and_passthrough() {
        let compressed = zstd::encode_all(PAYLOAD, 3).unwrap();
        assert_eq!(&*decompress(&compressed).unwrap(), PAYLOAD);
        assert!(matches!(decompress(PAYLOAD).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncated_frame_is_decode_error() {
        let compressed = zstd::encode_all(&PAYLOAD.repeat(64)[..], 3).unwrap();
        let truncated = &compressed[..compressed.len() / 2];
        assert!(matches!(decompress(truncated), Err(Error::Decode(_))));
    }
}
