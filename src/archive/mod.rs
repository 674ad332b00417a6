//! Box container access.
//!
//! A box file is a tar archive whose regular-file members are individually
//! zstd-compressed snapshots. This layer only knows about members and their
//! byte ranges; it never looks inside a payload.
//!
//! ```text
//! +-------------+-----------------+-------------+-----------------+-----+
//! | tar header  | member 0 bytes  | tar header  | member 1 bytes  | ... |
//! +-------------+-----------------+-------------+-----------------+-----+
//!               ^ data_pos                      ^ data_pos
//! ```

mod format;
mod reader;

pub use format::*;
pub use reader::*;
