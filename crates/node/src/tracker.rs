//! Outbound client for the tracker directory.

use std::time::Duration;

use shoal_primitives::FileRecord;
use shoal_rpc::tracker::tracker_client::TrackerClient;
use shoal_rpc::tracker::{
    GetPeersForFileRequest, Peer, RegisterPeerRequest, UnRegisterPeerRequest, UpdatePeerRequest,
};
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Request};

use crate::error::NodeError;

/// Deadline applied to liveness and control-plane calls.
pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the tracker, bound to this peer's advertised host.
///
/// Cheap to clone; every call carries a [`LIVENESS_TIMEOUT`] deadline.
#[derive(Clone)]
pub struct TrackerHandle {
    client: TrackerClient<Channel>,
    host: String,
}

impl TrackerHandle {
    /// Connect to the tracker at `tracker_addr`, advertising as `host`.
    pub async fn connect(tracker_addr: &str, host: impl Into<String>) -> Result<Self, NodeError> {
        let channel = Endpoint::from_shared(format!("http://{tracker_addr}"))?
            .connect_timeout(LIVENESS_TIMEOUT)
            .connect()
            .await?;
        Ok(Self {
            client: TrackerClient::new(channel),
            host: host.into(),
        })
    }

    /// The host string this peer is registered under.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Register this peer with its full file set.
    ///
    /// A transport failure or a non-OK status body is an error; callers treat
    /// either as fatal at startup.
    pub async fn register(&self, files: Vec<FileRecord>) -> Result<(), NodeError> {
        let mut request = Request::new(RegisterPeerRequest {
            host: self.host.clone(),
            files: files.into_iter().map(Into::into).collect(),
        });
        request.set_timeout(LIVENESS_TIMEOUT);

        let resp = self.client.clone().register_peer(request).await?.into_inner();
        if resp.status_code != Code::Ok as i32 {
            return Err(NodeError::Registration {
                code: resp.status_code,
                message: resp.message,
            });
        }
        Ok(())
    }

    /// Replace this peer's advertised file set.
    pub async fn update(&self, files: Vec<FileRecord>) -> Result<(), NodeError> {
        let mut request = Request::new(UpdatePeerRequest {
            host: self.host.clone(),
            files: files.into_iter().map(Into::into).collect(),
        });
        request.set_timeout(LIVENESS_TIMEOUT);

        self.client.clone().update_peer(request).await?;
        Ok(())
    }

    /// Remove this peer from the directory.
    pub async fn unregister(&self) -> Result<(), NodeError> {
        let mut request = Request::new(UnRegisterPeerRequest {
            host: self.host.clone(),
        });
        request.set_timeout(LIVENESS_TIMEOUT);

        self.client.clone().un_register_peer(request).await?;
        Ok(())
    }

    /// Every peer the tracker believes holds `name`, in tracker order.
    pub async fn peers_for_file(&self, name: &str) -> Result<Vec<Peer>, NodeError> {
        let mut request = Request::new(GetPeersForFileRequest {
            file_name: name.to_string(),
        });
        request.set_timeout(LIVENESS_TIMEOUT);

        let resp = self.client.clone().get_peers_for_file(request).await?;
        Ok(resp.into_inner().peers)
    }
}
