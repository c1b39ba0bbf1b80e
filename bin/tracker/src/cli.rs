use std::net::SocketAddr;

use clap::Parser;

/// Command line arguments for the tracker daemon.
#[derive(Debug, Parser)]
#[command(name = "shoal-tracker", about = "Peer directory for the shoal network")]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "TRACKER_LISTEN", default_value = "0.0.0.0:50051", value_name = "ADDR")]
    pub listen: SocketAddr,
}
