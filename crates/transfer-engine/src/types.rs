//! Request and result records exchanged with the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tx_wire::{CompiledMessage, Pubkey};

/// One transfer of `amount` base units of `mint` from the sender's wallet
/// to the recipient's. The sender pays the network fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub sender: Pubkey,
    pub recipient: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

/// An assembled, placeholder-signed transaction plus the structured view
/// of what went into it. `bytes` is ready for external wallet software to
/// sign and broadcast as-is.
#[derive(Debug, Clone)]
pub struct UnsignedTransfer {
    pub bytes: Vec<u8>,
    pub message: CompiledMessage,
    pub fee_payer: Pubkey,
    pub sender_token_account: Pubkey,
    pub recipient_token_account: Pubkey,
    /// Whether a create-account instruction was prepended for the
    /// recipient (including the pessimistic probe-failure case).
    pub creates_recipient_account: bool,
}

/// The record handed to the presentation layer after submission.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    /// Base58 transaction signature, as returned by the RPC.
    pub signature: String,
    pub amount: u64,
    pub mint: Pubkey,
    pub recipient: Pubkey,
    pub timestamp: DateTime<Utc>,
}
