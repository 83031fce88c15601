//! Submission: base64-encode the signed bytes and hand them to the RPC.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::debug;

use tx_rpc::{RpcClient, SendOptions};

use crate::error::TransferError;

/// Submit a fully signed transaction. Returns the base58 signature; on
/// rejection the RPC's own error text comes back untouched inside
/// [`TransferError::Rpc`], since it usually names the on-chain cause
/// (insufficient funds, expired blockhash).
pub async fn submit(
    rpc: &RpcClient,
    signed_tx: &[u8],
    options: &SendOptions,
) -> Result<String, TransferError> {
    let encoded = BASE64.encode(signed_tx);
    debug!(tx_bytes = signed_tx.len(), "submitting signed transaction");

    let signature = rpc.send_transaction(&encoded, options).await?;
    Ok(signature)
}
