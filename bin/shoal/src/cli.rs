use clap::{Parser, Subcommand};

use crate::commands::download::DownloadArgs;
use crate::commands::peers::PeersArgs;
use crate::commands::upload::UploadArgs;

/// Thin client for the shoal file-sharing network.
#[derive(Debug, Parser)]
#[command(name = "shoal", about = "Upload to, download from and inspect the shoal network")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download a file from a peer.
    Download(DownloadArgs),
    /// Upload a local file to a peer.
    Upload(UploadArgs),
    /// List every peer the tracker knows about.
    Peers(PeersArgs),
}
