//! Tracker-side directory for the shoal network.
//!
//! The directory is an in-memory, concurrent mapping from peer host to the
//! files that peer advertises. [`PeerStore`] holds the state under a
//! readers-writer lock; [`TrackerService`] exposes the five directory
//! operations over gRPC.

mod service;
mod store;

pub use service::TrackerService;
pub use store::{DirectoryError, PeerEntry, PeerStore};
