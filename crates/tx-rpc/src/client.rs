//! The JSON-RPC client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use tx_wire::Pubkey;

use crate::error::RpcError;
use crate::types::{BlockhashInfo, Commitment, Envelope, SendOptions, WithContext};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A pooled HTTPS JSON-RPC 2.0 client bound to one endpoint.
///
/// Cheap to share by reference across concurrent transfer requests; the
/// underlying `reqwest` pool is the only state they share.
#[derive(Debug)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: Url,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Client with the default connect/read timeouts.
    pub fn new(endpoint: Url) -> Result<Self, RpcError> {
        Self::with_timeouts(endpoint, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeouts(
        endpoint: Url,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        Ok(RpcClient {
            http,
            endpoint,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch a recent blockhash to anchor a transaction to.
    pub async fn latest_blockhash(
        &self,
        commitment: Commitment,
    ) -> Result<[u8; 32], RpcError> {
        let ctx: WithContext<BlockhashInfo> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": commitment.as_str() }]),
            )
            .await?;

        let encoded = ctx.value.blockhash;
        let bytes = bs58::decode(&encoded)
            .into_vec()
            .map_err(|e| RpcError::Malformed(format!("blockhash is not base58: {e}")))?;
        let hash: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            RpcError::Malformed(format!("blockhash is {} bytes, expected 32", v.len()))
        })?;

        debug!(blockhash = %encoded, "fetched recent blockhash");
        Ok(hash)
    }

    /// Whether `pubkey` exists on-chain: true iff `getAccountInfo` returns
    /// a non-null `value`.
    ///
    /// Errors are returned as-is; the assembler decides what a failed
    /// probe means for the request.
    pub async fn account_exists(
        &self,
        pubkey: &Pubkey,
        commitment: Commitment,
    ) -> Result<bool, RpcError> {
        let ctx: WithContext<Option<Value>> = self
            .call(
                "getAccountInfo",
                json!([
                    pubkey.to_base58(),
                    { "encoding": "base64", "commitment": commitment.as_str() }
                ]),
            )
            .await?;

        Ok(ctx.value.is_some())
    }

    /// Submit a base64-encoded signed transaction; returns the base58
    /// transaction signature.
    pub async fn send_transaction(
        &self,
        tx_base64: &str,
        options: &SendOptions,
    ) -> Result<String, RpcError> {
        let mut cfg = json!({
            "encoding": "base64",
            "skipPreflight": options.skip_preflight,
            "preflightCommitment": options.preflight_commitment.as_str(),
        });
        if let Some(max) = options.max_retries {
            cfg["maxRetries"] = json!(max);
        }

        let signature: String = self
            .call("sendTransaction", json!([tx_base64, cfg]))
            .await?;

        debug!(%signature, "transaction submitted");
        Ok(signature)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(method, id, "rpc request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)
            .map_err(|e| RpcError::Malformed(format!("invalid JSON-RPC payload: {e}")))?;

        if let Some(err) = envelope.error {
            warn!(method, code = err.code, message = %err.message, "rpc returned error");
            return Err(RpcError::Protocol {
                code: err.code,
                message: err.message,
            });
        }

        envelope.result.ok_or_else(|| {
            RpcError::Malformed("reply carries neither result nor error".into())
        })
    }
}
