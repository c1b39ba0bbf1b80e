//! Peer node for the shoal network.
//!
//! A peer inventories its static directory at startup, registers the result
//! with the tracker, and then serves four kinds of traffic: liveness pings,
//! metadata queries, chunked downloads (from local disk, or relayed from
//! another peer while keeping a local copy), and chunked uploads.

mod error;
mod inventory;
mod relay;
mod service;
mod store;
mod tracker;

pub use error::NodeError;
pub use inventory::scan_static_dir;
pub use service::{NodeConfig, PeerService, DEFAULT_CHUNK_SIZE};
pub use store::FileStore;
pub use tracker::{TrackerHandle, LIVENESS_TIMEOUT};
