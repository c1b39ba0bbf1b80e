//! In-memory peer directory under a readers-writer lock.

use std::collections::HashMap;

use parking_lot::RwLock;
use shoal_primitives::FileRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("peer {0} not found")]
    PeerNotFound(String),
}

/// One peer and the files it advertises, materialized for callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerEntry {
    pub host: String,
    pub files: Vec<FileRecord>,
}

/// Mapping from peer host to advertised file set.
///
/// Every operation takes the lock for its whole critical section and never
/// holds it across I/O; reads materialize a snapshot so callers observe the
/// directory as of the moment of the call.
#[derive(Default)]
pub struct PeerStore {
    peers: RwLock<HashMap<String, HashMap<String, FileRecord>>>,
}

impl PeerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any prior entry for `host` with exactly the supplied files.
    ///
    /// Registration never fails; re-registering is replacement, not a merge.
    pub fn register(&self, host: &str, files: Vec<FileRecord>) {
        let files: HashMap<String, FileRecord> = files
            .into_iter()
            .map(|file| (file.name.clone(), file))
            .collect();
        self.peers.write().insert(host.to_string(), files);
    }

    /// Remove the entry for `host`.
    pub fn unregister(&self, host: &str) -> Result<(), DirectoryError> {
        match self.peers.write().remove(host) {
            Some(_) => Ok(()),
            None => Err(DirectoryError::PeerNotFound(host.to_string())),
        }
    }

    /// Replace the file set of an already-registered peer wholesale.
    pub fn update(&self, host: &str, files: Vec<FileRecord>) -> Result<(), DirectoryError> {
        let mut peers = self.peers.write();
        let entry = peers
            .get_mut(host)
            .ok_or_else(|| DirectoryError::PeerNotFound(host.to_string()))?;
        *entry = files
            .into_iter()
            .map(|file| (file.name.clone(), file))
            .collect();
        Ok(())
    }

    /// Snapshot of every registered peer. Order is unspecified.
    pub fn all_peers(&self) -> Vec<PeerEntry> {
        self.peers
            .read()
            .iter()
            .map(|(host, files)| PeerEntry {
                host: host.clone(),
                files: files.values().cloned().collect(),
            })
            .collect()
    }

    /// Every peer advertising a file with exactly this name.
    ///
    /// Matching is by name only; peers claiming the same name with different
    /// contents are all returned.
    pub fn peers_with_file(&self, name: &str) -> Vec<PeerEntry> {
        self.peers
            .read()
            .iter()
            .filter_map(|(host, files)| {
                files.get(name).map(|file| PeerEntry {
                    host: host.clone(),
                    files: vec![file.clone()],
                })
            })
            .collect()
    }

    /// Number of registered peers.
    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }
}
