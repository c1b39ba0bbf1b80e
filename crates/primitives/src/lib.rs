//! Shared leaf types for the shoal file-sharing network.
//!
//! Everything here is pure data and hashing: the [`FileRecord`] that both the
//! tracker directory and the peer-local index store, the chunk-count math used
//! by streaming transfers, and SHA-256 helpers rendering uppercase hex.

mod checksum;

pub use checksum::{checksum_of, checksum_of_file, Checksum};

/// Metadata describing one file held somewhere on the network.
///
/// `name` is the primary key within a single peer's store; `size` and
/// `checksum` describe the on-disk bytes at the time the record was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Plain file name, no path separators.
    pub name: String,
    /// Byte length of the file contents.
    pub size: u64,
    /// Uppercase hex SHA-256 over the full file contents.
    pub checksum: String,
}

/// Number of frames needed to carry `size` bytes in chunks of `chunk_size`.
///
/// A zero-byte file needs zero frames; the final frame may be shorter than
/// `chunk_size`.
pub fn total_chunks(size: u64, chunk_size: u64) -> u32 {
    if chunk_size == 0 {
        return 0;
    }
    size.div_ceil(chunk_size) as u32
}
