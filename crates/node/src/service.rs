//! gRPC surface of a peer node.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use shoal_primitives::{total_chunks, Checksum, FileRecord};
use shoal_rpc::peer::peer_server::Peer;
use shoal_rpc::peer::{
    CheckFileExistenceRequest, CheckFileExistenceResponse, DownloadFileRequest, FileChunk,
    GetFileMetadataRequest, GetFileMetadataResponse, PingRequest, PingResponse, UploadFileChunk,
    UploadFileResponse,
};
use shoal_rpc::STATUS_OK;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, info, warn};

use crate::error::NodeError;
use crate::inventory::scan_static_dir;
use crate::relay;
use crate::store::FileStore;
use crate::tracker::TrackerHandle;

/// Default chunk size for download streams served by this peer.
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

/// Frames buffered between a producer task and the response stream.
pub(crate) const CHANNEL_DEPTH: usize = 8;

/// Configuration for bootstrapping a peer node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// address:port this peer serves on and advertises to the tracker.
    pub host: String,
    /// address:port of the tracker directory.
    pub tracker_addr: String,
    /// Flat directory of files this peer holds.
    pub static_dir: PathBuf,
    /// Chunk size for download streams.
    pub chunk_size: u64,
}

pub(crate) type DownloadStream = ReceiverStream<Result<FileChunk, Status>>;

/// Peer service implementation.
///
/// Serves pings, metadata queries, chunked downloads (local or relayed) and
/// chunked uploads over the shared [`FileStore`].
pub struct PeerService {
    pub(crate) store: Arc<FileStore>,
    pub(crate) tracker: TrackerHandle,
    pub(crate) static_dir: PathBuf,
    pub(crate) chunk_size: u64,
}

impl PeerService {
    /// Inventory the static directory, connect to the tracker and register.
    ///
    /// Any failure here is fatal for peer startup: a peer that cannot
    /// advertise its files is not part of the network.
    pub async fn bootstrap(config: NodeConfig) -> Result<Self, NodeError> {
        tokio::fs::create_dir_all(&config.static_dir).await?;

        let dir = config.static_dir.clone();
        let records = tokio::task::spawn_blocking(move || scan_static_dir(&dir))
            .await
            .map_err(io::Error::other)??;

        let store = Arc::new(FileStore::new());
        for record in &records {
            store.insert(record.clone());
        }
        info!(host = %config.host, files = records.len(), "inventoried static directory");

        let tracker = TrackerHandle::connect(&config.tracker_addr, config.host.clone()).await?;
        tracker.register(records).await?;
        info!(tracker = %config.tracker_addr, "registered with tracker");

        Ok(Self {
            store,
            tracker,
            static_dir: config.static_dir,
            chunk_size: config.chunk_size,
        })
    }

    /// Handle to the tracker this peer registered with.
    pub fn tracker(&self) -> TrackerHandle {
        self.tracker.clone()
    }

    /// Shared index of locally held files.
    pub fn file_store(&self) -> Arc<FileStore> {
        Arc::clone(&self.store)
    }

    /// Stream a locally held file in order, one chunk per frame.
    async fn serve_local(&self, name: &str) -> Result<DownloadStream, Status> {
        let path = self.static_dir.join(name);
        let mut file = File::open(&path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Status::not_found(format!("file [{name}] not found")),
            _ => Status::internal(format!("open {}: {e}", path.display())),
        })?;
        let size = file
            .metadata()
            .await
            .map_err(|e| Status::internal(format!("stat {}: {e}", path.display())))?
            .len();

        let total = total_chunks(size, self.chunk_size);
        let chunk_size = self.chunk_size;
        let name = name.to_string();
        let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);

        tokio::spawn(async move {
            let mut remaining = size;
            for chunk_number in 1..=total {
                let len = remaining.min(chunk_size) as usize;
                let mut data = vec![0u8; len];
                if let Err(e) = file.read_exact(&mut data).await {
                    let _ = tx
                        .send(Err(Status::internal(format!("read {name}: {e}"))))
                        .await;
                    return;
                }
                remaining -= len as u64;

                let frame = FileChunk {
                    chunk_number,
                    total_chunks: total,
                    data,
                };
                if tx.send(Ok(frame)).await.is_err() {
                    // Caller went away; stop reading.
                    return;
                }
            }
        });

        Ok(ReceiverStream::new(rx))
    }
}

#[tonic::async_trait]
impl Peer for PeerService {
    async fn ping(&self, request: Request<PingRequest>) -> Result<Response<PingResponse>, Status> {
        let message = format!("peer[{}]: {}", self.tracker.host(), request.into_inner().message);
        Ok(Response::new(PingResponse {
            status: STATUS_OK.to_string(),
            message,
            timestamp: Some(prost_types::Timestamp::from(SystemTime::now())),
        }))
    }

    async fn check_file_existence(
        &self,
        request: Request<CheckFileExistenceRequest>,
    ) -> Result<Response<CheckFileExistenceResponse>, Status> {
        let name = request.into_inner().name;
        match self.store.get(&name) {
            Some(record) => Ok(Response::new(CheckFileExistenceResponse {
                exists: true,
                metadata: Some(record.into()),
            })),
            None => Err(Status::not_found(format!("file [{name}] not found"))),
        }
    }

    async fn get_file_metadata(
        &self,
        request: Request<GetFileMetadataRequest>,
    ) -> Result<Response<GetFileMetadataResponse>, Status> {
        let name = request.into_inner().name;
        match self.store.get(&name) {
            Some(record) => Ok(Response::new(GetFileMetadataResponse {
                metadata: Some(record.into()),
            })),
            None => Err(Status::not_found(format!("file [{name}] not found"))),
        }
    }

    type DownloadFileStream = DownloadStream;

    async fn download_file(
        &self,
        request: Request<DownloadFileRequest>,
    ) -> Result<Response<Self::DownloadFileStream>, Status> {
        let name = request.into_inner().file_name;

        if self.store.contains(&name) {
            debug!(file = %name, "serving from local store");
            return Ok(Response::new(self.serve_local(&name).await?));
        }

        info!(file = %name, "file not held locally, trying the network");
        let stream = relay::fetch(self, &name).await?;
        Ok(Response::new(stream))
    }

    async fn upload_file(
        &self,
        request: Request<Streaming<UploadFileChunk>>,
    ) -> Result<Response<UploadFileResponse>, Status> {
        let mut frames = request.into_inner();
        let recv_err = |status: Status| Status::internal(format!("receive chunk: {status}"));

        let Some(first) = frames.message().await.map_err(recv_err)? else {
            // Stream ended before any frame; nothing to create or record.
            return Ok(Response::new(UploadFileResponse {
                success: true,
                message: STATUS_OK.to_string(),
            }));
        };

        // The first frame's name keys the whole transfer; any prior content
        // at that path is truncated.
        let name = first.file_name.clone();
        let path = self.static_dir.join(&name);
        let file = File::create(&path)
            .await
            .map_err(|e| Status::internal(format!("create {}: {e}", path.display())))?;
        let mut writer = BufWriter::new(file);
        let mut digest = Checksum::new();

        let mut next = Some(first);
        while let Some(chunk) = next {
            digest.update(&chunk.data);
            writer
                .write_all(&chunk.data)
                .await
                .map_err(|e| Status::internal(format!("write: {e}")))?;
            next = frames.message().await.map_err(recv_err)?;
        }

        writer
            .flush()
            .await
            .map_err(|e| Status::internal(format!("flush: {e}")))?;
        let size = writer
            .into_inner()
            .metadata()
            .await
            .map_err(|e| Status::internal(format!("stat: {e}")))?
            .len();

        self.store.insert(FileRecord {
            name: name.clone(),
            size,
            checksum: digest.finish(),
        });

        if let Err(e) = self.tracker.update(self.store.list()).await {
            // Membership propagation does not gate the upload result.
            warn!(error = %e, "tracker update after upload failed");
        }
        info!(file = %name, size, "upload complete");

        Ok(Response::new(UploadFileResponse {
            success: true,
            message: STATUS_OK.to_string(),
        }))
    }
}
