use thiserror::Error;

use tx_rpc::RpcError;
use tx_wire::WireError;

/// Transfer request failures.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The sender's token account is confirmed absent on-chain (a null
    /// probe result, not a failed probe). Non-retryable: there is nothing
    /// to transfer from.
    #[error("sender token account does not exist on-chain")]
    SenderAccountMissing,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}
