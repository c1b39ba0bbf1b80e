//! SHA-256 content hashing, rendered as uppercase hex.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Incremental SHA-256 digest for streaming receive paths.
///
/// Fed in lockstep with the byte sink so the finished checksum always
/// describes exactly what was written.
#[derive(Default)]
pub struct Checksum {
    hasher: Sha256,
}

impl Checksum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Consume the digest and render it as uppercase hex.
    pub fn finish(self) -> String {
        hex::encode_upper(self.hasher.finalize())
    }
}

/// Checksum of an in-memory byte slice.
pub fn checksum_of(bytes: &[u8]) -> String {
    let mut digest = Checksum::new();
    digest.update(bytes);
    digest.finish()
}

/// Checksum of the file at `path`, read in buffered chunks.
pub fn checksum_of_file(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut digest = Checksum::new();
    let mut buf = [0u8; 32 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        digest.update(&buf[..n]);
    }
    Ok(digest.finish())
}
