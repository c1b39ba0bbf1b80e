//! Store-and-forward relay: fetch a file from another peer while streaming
//! it to the caller.
//!
//! Candidates come back from the tracker in lookup order and are probed one
//! by one; the first that answers a ping and a metadata query becomes the
//! upstream source. Each received frame is appended to the local copy and
//! forwarded verbatim, so the caller sees the stream as if served directly.
//! On a clean end of stream the local copy is verified against the
//! advertised metadata, recorded in the store, and re-advertised to the
//! tracker.

use std::sync::Arc;

use shoal_primitives::{Checksum, FileRecord};
use shoal_rpc::peer::peer_client::PeerClient;
use shoal_rpc::peer::{
    DownloadFileRequest, FileChunk, FileMetadata, GetFileMetadataRequest, PingRequest,
};
use shoal_rpc::STATUS_OK;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Status, Streaming};
use tracing::{debug, info, warn};

use crate::service::{DownloadStream, PeerService, CHANNEL_DEPTH};
use crate::tracker::LIVENESS_TIMEOUT;

/// A located upstream source: the serving peer, its advertised metadata and
/// an open chunk stream.
struct Source {
    host: String,
    meta: FileMetadata,
    stream: Streaming<FileChunk>,
}

/// Locate a holder of `name` and stream it to the caller while keeping a
/// local copy.
pub(crate) async fn fetch(service: &PeerService, name: &str) -> Result<DownloadStream, Status> {
    let Source {
        host,
        meta,
        mut stream,
    } = locate(service, name).await?;

    // Only now that an upstream stream is open does the destination file get
    // created and truncated.
    let path = service.static_dir.join(&meta.name);
    let file = File::create(&path)
        .await
        .map_err(|e| Status::internal(format!("create {}: {e}", path.display())))?;

    let store = Arc::clone(&service.store);
    let tracker = service.tracker.clone();
    let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);

    tokio::spawn(async move {
        let mut writer = BufWriter::new(file);
        let mut digest = Checksum::new();
        let mut written: u64 = 0;

        loop {
            match stream.message().await {
                Ok(Some(chunk)) => {
                    if let Err(e) = writer.write_all(&chunk.data).await {
                        let _ = tx
                            .send(Err(Status::internal(format!(
                                "write {}: {e}",
                                path.display()
                            ))))
                            .await;
                        return;
                    }
                    digest.update(&chunk.data);
                    written += chunk.data.len() as u64;

                    if tx.send(Ok(chunk)).await.is_err() {
                        // Caller cancelled; dropping the upstream leg cancels it too.
                        debug!(file = %meta.name, "caller went away mid-relay");
                        return;
                    }
                }
                Ok(None) => break,
                // The first receive error is fatal for the stream.
                Err(status) => {
                    warn!(file = %meta.name, peer = %host, error = %status, "upstream receive failed");
                    let _ = tx
                        .send(Err(Status::internal(format!("upstream receive: {status}"))))
                        .await;
                    return;
                }
            }
        }

        if let Err(e) = writer.flush().await {
            let _ = tx.send(Err(Status::internal(format!("flush: {e}")))).await;
            return;
        }

        let checksum = digest.finish();
        if written != meta.size || checksum != meta.checksum {
            warn!(
                file = %meta.name,
                peer = %host,
                advertised_size = meta.size,
                written,
                "relayed bytes do not match advertised metadata, discarding"
            );
            let _ = tokio::fs::remove_file(&path).await;
            let _ = tx
                .send(Err(Status::internal(format!(
                    "relayed file [{}] failed verification",
                    meta.name
                ))))
                .await;
            return;
        }

        store.insert(FileRecord {
            name: meta.name.clone(),
            size: meta.size,
            checksum,
        });
        if let Err(e) = tracker.update(store.list()).await {
            // Membership propagation is best-effort after a committed relay.
            warn!(error = %e, "tracker update after relay failed");
        }
        info!(file = %meta.name, size = meta.size, peer = %host, "relay committed");
        // Dropping tx terminates the caller stream cleanly.
    });

    Ok(ReceiverStream::new(rx))
}

/// Probe lookup candidates in tracker order until one serves the file.
async fn locate(service: &PeerService, name: &str) -> Result<Source, Status> {
    let holders = service
        .tracker
        .peers_for_file(name)
        .await
        .map_err(|e| Status::internal(format!("get peers for file: {e}")))?;

    if holders.is_empty() {
        info!(file = %name, "no peer in the network holds the file");
        return Err(Status::not_found(format!(
            "file [{name}] not found in network"
        )));
    }
    debug!(file = %name, candidates = holders.len(), "tracker returned candidates");

    for candidate in holders {
        let host = candidate.host;

        let mut client = match connect_peer(&host).await {
            Ok(client) => client,
            Err(e) => {
                warn!(peer = %host, error = %e, "dial failed, skipping candidate");
                continue;
            }
        };

        match ping(&mut client).await {
            Ok(status) if status == STATUS_OK => {}
            Ok(status) => {
                warn!(peer = %host, %status, "ping status not ok, skipping candidate");
                continue;
            }
            Err(e) => {
                warn!(peer = %host, error = %e, "ping failed, skipping candidate");
                continue;
            }
        }

        let meta = match metadata(&mut client, name).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!(peer = %host, error = %e, "metadata fetch failed, skipping candidate");
                continue;
            }
        };

        match open_download(&mut client, &meta.name).await {
            Ok(stream) => {
                info!(file = %name, peer = %host, "relaying from peer");
                return Ok(Source { host, meta, stream });
            }
            Err(e) => {
                warn!(peer = %host, error = %e, "failed to open download stream, skipping candidate");
                continue;
            }
        }
    }

    Err(Status::not_found(format!(
        "file [{name}] not available from any peer"
    )))
}

async fn connect_peer(host: &str) -> Result<PeerClient<Channel>, tonic::transport::Error> {
    let channel = Endpoint::from_shared(format!("http://{host}"))?
        .connect_timeout(LIVENESS_TIMEOUT)
        .connect()
        .await?;
    Ok(PeerClient::new(channel))
}

async fn ping(client: &mut PeerClient<Channel>) -> Result<String, Status> {
    let mut request = Request::new(PingRequest {
        message: "relay probe".to_string(),
    });
    request.set_timeout(LIVENESS_TIMEOUT);
    Ok(client.ping(request).await?.into_inner().status)
}

async fn metadata(
    client: &mut PeerClient<Channel>,
    name: &str,
) -> Result<FileMetadata, Status> {
    let mut request = Request::new(GetFileMetadataRequest {
        name: name.to_string(),
    });
    request.set_timeout(LIVENESS_TIMEOUT);
    let resp = client.get_file_metadata(request).await?.into_inner();
    resp.metadata
        .ok_or_else(|| Status::internal("metadata response missing body"))
}

/// The data-plane leg carries no deadline; it runs to completion or
/// transport failure.
async fn open_download(
    client: &mut PeerClient<Channel>,
    name: &str,
) -> Result<Streaming<FileChunk>, Status> {
    let resp = client
        .download_file(DownloadFileRequest {
            file_name: name.to_string(),
        })
        .await?;
    Ok(resp.into_inner())
}
