use std::net::SocketAddr;

use clap::Parser;
use eyre::WrapErr;
use shoal_node::{NodeConfig, PeerService};
use shoal_rpc::peer::peer_server::PeerServer;
use tonic::transport::Server;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = cli
        .host
        .parse()
        .wrap_err_with(|| format!("invalid peer host '{}'", cli.host))?;

    let service = PeerService::bootstrap(NodeConfig {
        host: cli.host.clone(),
        tracker_addr: cli.tracker.clone(),
        static_dir: cli.static_dir.clone(),
        chunk_size: cli.chunk_size,
    })
    .await
    .wrap_err("peer bootstrap failed")?;

    // Kept for the shutdown-time unregister after the server drains.
    let tracker = service.tracker();

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(shoal_rpc::FILE_DESCRIPTOR_SET)
        .build_v1()?;

    info!(addr = %addr, "peer listening");
    Server::builder()
        .add_service(PeerServer::new(service))
        .add_service(reflection)
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    if let Err(e) = tracker.unregister().await {
        warn!(error = %e, "failed to unregister from tracker");
    }
    info!("peer stopped");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}
