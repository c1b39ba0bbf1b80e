//! End-to-end tests for the tracker directory over a real gRPC transport.

use std::net::SocketAddr;
use std::sync::Arc;

use shoal_directory::{PeerStore, TrackerService};
use shoal_rpc::tracker::tracker_client::TrackerClient;
use shoal_rpc::tracker::tracker_server::TrackerServer;
use shoal_rpc::tracker::{
    File, GetPeersForFileRequest, GetPeersRequest, RegisterPeerRequest, UnRegisterPeerRequest,
    UpdatePeerRequest,
};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};
use tonic::Code;

async fn spawn_tracker() -> SocketAddr {
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

async fn connect(addr: SocketAddr) -> TrackerClient<Channel> {
    TrackerClient::connect(format!("http://{addr}")).await.unwrap()
}

fn file(name: &str) -> File {
    File {
        name: name.to_string(),
        size: 128,
        checksum: "0F".repeat(32),
    }
}

#[tokio::test]
async fn register_then_get_peers() {
    let addr = spawn_tracker().await;
    let mut client = connect(addr).await;

    let resp = client
        .register_peer(RegisterPeerRequest {
            host: "127.0.0.1:7001".to_string(),
            files: vec![file("a.txt"), file("b.txt")],
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(resp.status_code, Code::Ok as i32);
    assert_eq!(resp.message, "OK");

    let peers = client
        .get_peers(GetPeersRequest {})
        .await
        .unwrap()
        .into_inner()
        .peers;
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].host, "127.0.0.1:7001");
    assert_eq!(peers[0].files.len(), 2);
}

#[tokio::test]
async fn reregistration_replaces_file_set() {
    let addr = spawn_tracker().await;
    let mut client = connect(addr).await;

    let host = "127.0.0.1:7002".to_string();
    client
        .register_peer(RegisterPeerRequest {
            host: host.clone(),
            files: vec![file("old.txt")],
        })
        .await
        .unwrap();
    client
        .register_peer(RegisterPeerRequest {
            host: host.clone(),
            files: vec![file("new.txt")],
        })
        .await
        .unwrap();

    let peers = client
        .get_peers(GetPeersRequest {})
        .await
        .unwrap()
        .into_inner()
        .peers;
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].files.len(), 1);
    assert_eq!(peers[0].files[0].name, "new.txt");
}

#[tokio::test]
async fn lookup_then_unregister() {
    let addr = spawn_tracker().await;
    let mut client = connect(addr).await;

    for host in ["127.0.0.1:1", "127.0.0.1:2"] {
        client
            .register_peer(RegisterPeerRequest {
                host: host.to_string(),
                files: vec![file("fileA")],
            })
            .await
            .unwrap();
    }

    let holders = client
        .get_peers_for_file(GetPeersForFileRequest {
            file_name: "fileA".to_string(),
        })
        .await
        .unwrap()
        .into_inner()
        .peers;
    assert_eq!(holders.len(), 2);

    client
        .un_register_peer(UnRegisterPeerRequest {
            host: "127.0.0.1:1".to_string(),
        })
        .await
        .unwrap();

    let holders = client
        .get_peers_for_file(GetPeersForFileRequest {
            file_name: "fileA".to_string(),
        })
        .await
        .unwrap()
        .into_inner()
        .peers;
    assert_eq!(holders.len(), 1);
    assert_eq!(holders[0].host, "127.0.0.1:2");
}

#[tokio::test]
async fn lookup_misses_return_empty() {
    let addr = spawn_tracker().await;
    let mut client = connect(addr).await;

    let holders = client
        .get_peers_for_file(GetPeersForFileRequest {
            file_name: "nowhere.bin".to_string(),
        })
        .await
        .unwrap()
        .into_inner()
        .peers;
    assert!(holders.is_empty());
}

#[tokio::test]
async fn unregister_absent_peer_is_not_found() {
    let addr = spawn_tracker().await;
    let mut client = connect(addr).await;

    let status = client
        .un_register_peer(UnRegisterPeerRequest {
            host: "10.1.1.1:9".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    // And it was a no-op.
    let peers = client
        .get_peers(GetPeersRequest {})
        .await
        .unwrap()
        .into_inner()
        .peers;
    assert!(peers.is_empty());
}

#[tokio::test]
async fn update_absent_peer_is_not_found() {
    let addr = spawn_tracker().await;
    let mut client = connect(addr).await;

    let status = client
        .update_peer(UpdatePeerRequest {
            host: "10.1.1.1:9".to_string(),
            files: vec![file("a.txt")],
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn update_replaces_wholesale() {
    let addr = spawn_tracker().await;
    let mut client = connect(addr).await;

    let host = "127.0.0.1:7003".to_string();
    client
        .register_peer(RegisterPeerRequest {
            host: host.clone(),
            files: vec![file("a.txt"), file("b.txt")],
        })
        .await
        .unwrap();

    let resp = client
        .update_peer(UpdatePeerRequest {
            host: host.clone(),
            files: vec![file("c.txt")],
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(resp.status_code, Code::Ok as i32);

    let peers = client
        .get_peers(GetPeersRequest {})
        .await
        .unwrap()
        .into_inner()
        .peers;
    assert_eq!(peers[0].files.len(), 1);
    assert_eq!(peers[0].files[0].name, "c.txt");
}
