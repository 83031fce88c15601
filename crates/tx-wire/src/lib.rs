//! Manual Solana transaction wire format for SPL token transfers.
//!
//! Everything in this crate is built by hand — no `solana-sdk`. The
//! higher-level SDK serializer produced transactions some wallets refused
//! to simulate, so the legacy wire layout is implemented here directly to
//! keep the emitted bytes exactly what wallet software expects:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures (zero until signed)
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```
//!
//! The crate is pure and synchronous: no I/O, no async. Network access
//! lives in `tx-rpc`, orchestration in `transfer-engine`.

pub mod compact;
pub mod error;
pub mod instructions;
pub mod ledger;
pub mod message;
pub mod pda;
pub mod pubkey;
pub mod signer;

pub use error::WireError;
pub use instructions::{
    create_associated_account, spl_token_transfer, system_transfer,
    ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use ledger::{AccountLedger, AccountRef, Instruction};
pub use message::{CompiledInstruction, CompiledMessage, MessageHeader};
pub use pda::derive_associated_token_address;
pub use pubkey::Pubkey;
pub use signer::{sign_transaction, LocalSigner, SigningCapability, SIGNATURE_LEN};
