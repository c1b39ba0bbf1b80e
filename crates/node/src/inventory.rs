//! Startup inventory of the peer's static directory.

use std::io;
use std::path::Path;

use shoal_primitives::{checksum_of_file, FileRecord};
use tracing::debug;
use walkdir::WalkDir;

/// Walk `dir` and build a record for every regular file found.
///
/// Names are the plain directory-entry names; nested files keep only their
/// base name, matching the flat namespace the network speaks.
pub fn scan_static_dir(dir: &Path) -> io::Result<Vec<FileRecord>> {
    let mut records = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let size = entry.metadata().map_err(io::Error::other)?.len();
        let checksum = checksum_of_file(entry.path())?;

        debug!(file = %name, size, "inventoried file");
        records.push(FileRecord { name, size, checksum });
    }

    Ok(records)
}
