//! Conversions between generated message types and domain records.
//!
//! The tracker and peer protos both describe a file as (name, size,
//! checksum); crossing the RPC boundary copies the value either way.

use shoal_primitives::FileRecord;

use crate::{peer, tracker};

impl From<FileRecord> for tracker::File {
    fn from(record: FileRecord) -> Self {
        Self {
            name: record.name,
            size: record.size,
            checksum: record.checksum,
        }
    }
}

impl From<tracker::File> for FileRecord {
    fn from(file: tracker::File) -> Self {
        Self {
            name: file.name,
            size: file.size,
            checksum: file.checksum,
        }
    }
}

impl From<FileRecord> for peer::FileMetadata {
    fn from(record: FileRecord) -> Self {
        Self {
            name: record.name,
            size: record.size,
            checksum: record.checksum,
        }
    }
}

impl From<peer::FileMetadata> for FileRecord {
    fn from(meta: peer::FileMetadata) -> Self {
        Self {
            name: meta.name,
            size: meta.size,
            checksum: meta.checksum,
        }
    }
}
