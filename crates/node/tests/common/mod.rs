//! Shared harness: in-process tracker and peers on ephemeral ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use shoal_directory::{PeerStore, TrackerService};
use shoal_node::{FileStore, NodeConfig, PeerService};
use shoal_rpc::peer::peer_client::PeerClient;
use shoal_rpc::peer::peer_server::PeerServer;
use shoal_rpc::peer::{DownloadFileRequest, FileChunk};
use shoal_rpc::tracker::tracker_client::TrackerClient;
use shoal_rpc::tracker::tracker_server::TrackerServer;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};
use tonic::Status;

pub async fn spawn_tracker() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let service = TrackerService::new(Arc::new(PeerStore::new()));
    tokio::spawn(async move {
        Server::builder()
            .add_service(TrackerServer::new(service))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    addr
}

pub struct TestPeer {
    pub addr: SocketAddr,
    pub store: Arc<FileStore>,
}

/// Bootstrap a peer over `static_dir` and serve it on an ephemeral port.
pub async fn spawn_peer(tracker: SocketAddr, static_dir: &Path, chunk_size: u64) -> TestPeer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let service = PeerService::bootstrap(NodeConfig {
        host: addr.to_string(),
        tracker_addr: tracker.to_string(),
        static_dir: static_dir.to_path_buf(),
        chunk_size,
    })
    .await
    .unwrap();
    let store = service.file_store();

    tokio::spawn(async move {
        Server::builder()
            .add_service(PeerServer::new(service))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    TestPeer { addr, store }
}

pub async fn peer_client(addr: SocketAddr) -> PeerClient<Channel> {
    PeerClient::connect(format!("http://{addr}")).await.unwrap()
}

pub async fn tracker_client(addr: SocketAddr) -> TrackerClient<Channel> {
    TrackerClient::connect(format!("http://{addr}")).await.unwrap()
}

/// Drain a download stream, collecting every frame.
pub async fn download_all(
    client: &mut PeerClient<Channel>,
    name: &str,
) -> Result<Vec<FileChunk>, Status> {
    let mut stream = client
        .download_file(DownloadFileRequest {
            file_name: name.to_string(),
        })
        .await?
        .into_inner();

    let mut chunks = Vec::new();
    while let Some(chunk) = stream.message().await? {
        chunks.push(chunk);
    }
    Ok(chunks)
}

pub fn concat_data(chunks: &[FileChunk]) -> Vec<u8> {
    chunks.iter().flat_map(|c| c.data.iter().copied()).collect()
}
