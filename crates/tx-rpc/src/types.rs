//! Wire types for the three RPC calls the engine makes.

use serde::{Deserialize, Serialize};

/// Commitment level attached to queries and preflight checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// Options forwarded to `sendTransaction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: Commitment,
    /// Resubmission attempts the RPC node itself should make; `None`
    /// leaves the node's default in place.
    pub max_retries: Option<usize>,
}

impl Default for SendOptions {
    fn default() -> Self {
        SendOptions {
            skip_preflight: false,
            preflight_commitment: Commitment::Confirmed,
            max_retries: None,
        }
    }
}

// -- response envelopes -----------------------------------------------------

/// Top-level JSON-RPC reply: exactly one of `result` / `error`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub result: Option<T>,
    pub error: Option<ErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorObject {
    pub code: i64,
    pub message: String,
}

/// Solana wraps query results in a slot context; only `value` matters
/// here.
#[derive(Debug, Deserialize)]
pub(crate) struct WithContext<T> {
    pub value: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlockhashInfo {
    pub blockhash: String,
}
