//! Orchestration for SPL token transfers.
//!
//! [`TransactionAssembler`] sequences the whole flow for one transfer
//! request: fetch a recent blockhash, derive both associated token
//! accounts, probe their existence (with the defensive fallbacks described
//! on the assembler), build the instruction list, compile it through
//! `tx-wire`, and either hand back unsigned bytes for an external wallet
//! to sign or finish locally through a [`SigningCapability`] and submit.
//!
//! Nothing here is persisted or global. A wallet session is whatever the
//! caller passes in (a request value plus a signing capability), so the
//! engine stays free of ambient connection state, UI concerns, and any
//! particular authentication SDK.

pub mod assembler;
pub mod config;
pub mod error;
pub mod submit;
pub mod types;

pub use assembler::TransactionAssembler;
pub use config::EngineConfig;
pub use error::TransferError;
pub use types::{TransferReceipt, TransferRequest, UnsignedTransfer};

// The types callers need alongside the assembler.
pub use tx_rpc::{Commitment, RpcClient, SendOptions};
pub use tx_wire::{LocalSigner, Pubkey, SigningCapability};
