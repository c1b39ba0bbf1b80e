use std::sync::Arc;

use clap::Parser;
use shoal_directory::{PeerStore, TrackerService};
use shoal_rpc::tracker::tracker_server::TrackerServer;
use tonic::transport::Server;
use tracing::info;
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

    let store = Arc::new(PeerStore::new());
    let service = TrackerService::new(store);

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(shoal_rpc::FILE_DESCRIPTOR_SET)
        .build_v1()?;

    info!(addr = %cli.listen, "tracker listening");
    Server::builder()
        .add_service(TrackerServer::new(service))
        .add_service(reflection)
        .serve_with_shutdown(cli.listen, shutdown_signal())
        .await?;

    info!("tracker stopped");
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
