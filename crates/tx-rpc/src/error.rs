use thiserror::Error;

/// RPC transport and protocol errors.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The endpoint could not be reached: connect failure, timeout, TLS,
    /// or a non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint responded with a JSON-RPC `error` member. The message
    /// is the server's own text, unmodified.
    #[error("rpc error {code}: {message}")]
    Protocol { code: i64, message: String },

    /// The endpoint responded 200 but the payload did not decode into the
    /// expected shape.
    #[error("malformed rpc response: {0}")]
    Malformed(String),
}

impl RpcError {
    /// True when retrying against the same endpoint could conceivably
    /// succeed (network trouble rather than a server verdict).
    pub fn is_transport(&self) -> bool {
        matches!(self, RpcError::Transport(_))
    }
}
