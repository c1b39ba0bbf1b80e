use std::path::PathBuf;

use clap::Parser;
use shoal_node::DEFAULT_CHUNK_SIZE;

/// Command line arguments for the peer daemon.
#[derive(Debug, Parser)]
#[command(name = "shoal-peer", about = "File-serving peer for the shoal network")]
pub struct Cli {
    /// address:port this peer listens on and advertises to the tracker.
    #[arg(long, env = "PEER_HOST", value_name = "ADDR")]
    pub host: String,

    /// address:port of the tracker directory.
    #[arg(long, env = "TRACKER_ADDR", value_name = "ADDR")]
    pub tracker: String,

    /// Directory of files served by this peer.
    #[arg(long, env = "PEER_STATIC_DIR", default_value = "static", value_name = "DIR")]
    pub static_dir: PathBuf,

    /// Chunk size in bytes for download streams.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_name = "BYTES")]
    pub chunk_size: u64,
}
