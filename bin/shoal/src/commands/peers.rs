use clap::Args;
use eyre::{eyre, WrapErr};
use shoal_rpc::tracker::tracker_client::TrackerClient;
use shoal_rpc::tracker::GetPeersRequest;
use tonic::transport::Endpoint;
use tonic::Request;

use super::RPC_TIMEOUT;

#[derive(Debug, Args)]
pub struct PeersArgs {
    /// address:port of the tracker.
    #[arg(long, value_name = "ADDR")]
    pub tracker: String,
}

pub async fn run(args: PeersArgs) -> eyre::Result<()> {
    let channel = Endpoint::from_shared(format!("http://{}", args.tracker))
        .wrap_err_with(|| format!("invalid tracker address '{}'", args.tracker))?
        .connect_timeout(RPC_TIMEOUT)
        .connect()
        .await
        .wrap_err_with(|| format!("failed to connect to tracker {}", args.tracker))?;
    let mut client = TrackerClient::new(channel);

    let mut request = Request::new(GetPeersRequest {});
    request.set_timeout(RPC_TIMEOUT);
    let peers = client
        .get_peers(request)
        .await
        .map_err(|status| eyre!("get peers: {}", status.message()))?
        .into_inner()
        .peers;

    for peer in peers {
        println!("peer[{}]", peer.host);
        for file in peer.files {
            println!("\tfile[{}] ----> {}", file.name, file.checksum);
        }
    }

    Ok(())
}
