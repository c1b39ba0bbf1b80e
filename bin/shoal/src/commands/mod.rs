//! CLI subcommands and shared client plumbing.

pub mod download;
pub mod peers;
pub mod upload;

use std::time::Duration;

use eyre::WrapErr;
use shoal_rpc::peer::peer_client::PeerClient;
use shoal_rpc::peer::PingRequest;
use tonic::transport::{Channel, Endpoint};
use tonic::Request;

/// Deadline for liveness and control calls made by the CLI.
const RPC_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) async fn connect_peer(addr: &str) -> eyre::Result<PeerClient<Channel>> {
    let channel = Endpoint::from_shared(format!("http://{addr}"))
        .wrap_err_with(|| format!("invalid peer address '{addr}'"))?
        .connect_timeout(RPC_TIMEOUT)
        .connect()
        .await
        .wrap_err_with(|| format!("failed to connect to peer {addr}"))?;
    Ok(PeerClient::new(channel))
}

/// Probe the peer before moving any data.
pub(crate) async fn ping_peer(client: &mut PeerClient<Channel>) -> eyre::Result<()> {
    let mut request = Request::new(PingRequest {
        message: "Hi".to_string(),
    });
    request.set_timeout(RPC_TIMEOUT);
    client.ping(request).await.wrap_err("ping failed")?;
    Ok(())
}
