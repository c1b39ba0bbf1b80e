//! gRPC wire definitions for the shoal network.
//!
//! Two services: the tracker directory (`shoal.tracker.v1`) and the peer file
//! service (`shoal.peer.v1`). Generated stubs are re-exported here together
//! with conversions to and from [`shoal_primitives::FileRecord`].

mod convert;

/// Generated types for the tracker directory service.
pub mod tracker {
    tonic::include_proto!("shoal.tracker.v1");
}

/// Generated types for the peer file service.
pub mod peer {
    tonic::include_proto!("shoal.peer.v1");
}

/// File descriptor set for gRPC reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("shoal_descriptor");

/// Textual OK status carried in status-bearing responses and ping replies.
pub const STATUS_OK: &str = "OK";
