//! In-memory index of the files this peer holds.

use std::collections::HashMap;

use parking_lot::RwLock;
use shoal_primitives::FileRecord;

/// Index of locally held files, keyed by name.
///
/// Membership implies a fully written file of matching size exists under the
/// peer's static directory. Mutated on startup inventory, on completed
/// uploads and on committed relays; read on every metadata and download
/// request. Reads take the read lock, writes the write lock; no lock is held
/// across I/O.
#[derive(Default)]
pub struct FileStore {
    files: RwLock<HashMap<String, FileRecord>>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<FileRecord> {
        self.files.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.read().contains_key(name)
    }

    /// Insert or replace the record for a file.
    pub fn insert(&self, record: FileRecord) {
        self.files.write().insert(record.name.clone(), record);
    }

    /// Snapshot of every record, in unspecified order.
    pub fn list(&self) -> Vec<FileRecord> {
        self.files.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}
