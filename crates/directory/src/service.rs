//! gRPC surface of the peer directory.

use std::sync::Arc;

use shoal_rpc::tracker::tracker_server::Tracker;
use shoal_rpc::tracker::{
    GetPeersForFileRequest, GetPeersRequest, GetPeersResponse, Peer, RegisterPeerRequest,
    RegisterPeerResponse, UnRegisterPeerRequest, UnRegisterPeerResponse, UpdatePeerRequest,
    UpdatePeerResponse,
};
use shoal_rpc::STATUS_OK;
use tonic::{Code, Request, Response, Status};
use tracing::{debug, info};

use crate::store::{DirectoryError, PeerEntry, PeerStore};

/// Tracker service implementation.
///
/// Stateless beyond the shared [`PeerStore`]; every handler is one store
/// operation plus a response mapping.
pub struct TrackerService {
    store: Arc<PeerStore>,
}

impl TrackerService {
    /// Create a new tracker service over the given store.
    pub fn new(store: Arc<PeerStore>) -> Self {
        Self { store }
    }
}

fn to_proto_peers(entries: Vec<PeerEntry>) -> Vec<Peer> {
    entries
        .into_iter()
        .map(|entry| Peer {
            host: entry.host,
            files: entry.files.into_iter().map(Into::into).collect(),
        })
        .collect()
}

#[tonic::async_trait]
impl Tracker for TrackerService {
    async fn register_peer(
        &self,
        request: Request<RegisterPeerRequest>,
    ) -> Result<Response<RegisterPeerResponse>, Status> {
        let req = request.into_inner();
        let files = req.files.into_iter().map(Into::into).collect();

        self.store.register(&req.host, files);
        info!(peer = %req.host, "registered peer");

        Ok(Response::new(RegisterPeerResponse {
            status_code: Code::Ok as i32,
            message: STATUS_OK.to_string(),
        }))
    }

    async fn un_register_peer(
        &self,
        request: Request<UnRegisterPeerRequest>,
    ) -> Result<Response<UnRegisterPeerResponse>, Status> {
        let req = request.into_inner();

        match self.store.unregister(&req.host) {
            Ok(()) => {
                info!(peer = %req.host, "unregistered peer");
                Ok(Response::new(UnRegisterPeerResponse {
                    status_code: Code::Ok as i32,
                    message: STATUS_OK.to_string(),
                }))
            }
            Err(DirectoryError::PeerNotFound(host)) => {
                Err(Status::not_found(format!("peer {host} not found")))
            }
        }
    }

    async fn get_peers(
        &self,
        _request: Request<GetPeersRequest>,
    ) -> Result<Response<GetPeersResponse>, Status> {
        let peers = to_proto_peers(self.store.all_peers());
        Ok(Response::new(GetPeersResponse { peers }))
    }

    async fn get_peers_for_file(
        &self,
        request: Request<GetPeersForFileRequest>,
    ) -> Result<Response<GetPeersResponse>, Status> {
        let req = request.into_inner();
        let holders = self.store.peers_with_file(&req.file_name);
        debug!(file = %req.file_name, holders = holders.len(), "lookup by file name");

        Ok(Response::new(GetPeersResponse {
            peers: to_proto_peers(holders),
        }))
    }

    async fn update_peer(
        &self,
        request: Request<UpdatePeerRequest>,
    ) -> Result<Response<UpdatePeerResponse>, Status> {
        let req = request.into_inner();
        let files = req.files.into_iter().map(Into::into).collect();

        match self.store.update(&req.host, files) {
            Ok(()) => {
                debug!(peer = %req.host, "updated peer file set");
                Ok(Response::new(UpdatePeerResponse {
                    status_code: Code::Ok as i32,
                    message: STATUS_OK.to_string(),
                }))
            }
            Err(DirectoryError::PeerNotFound(host)) => {
                Err(Status::not_found(format!("peer {host} not found")))
            }
        }
    }
}
