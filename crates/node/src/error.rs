use thiserror::Error;

/// Errors raised while bootstrapping or talking to the network.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Local filesystem failure.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to establish or use a transport channel.
    #[error("transport: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// A dependency answered with an RPC error.
    #[error("rpc: {0}")]
    Rpc(#[from] tonic::Status),

    /// The tracker answered registration with a non-OK status body.
    #[error("tracker rejected registration with status {code}: {message}")]
    Registration { code: i32, message: String },
}
