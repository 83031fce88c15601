//! Instruction builders for the transfer flows the engine supports:
//! SPL token transfer, associated token account creation, and native SOL
//! transfer.

use crate::error::WireError;
use crate::ledger::{AccountRef, Instruction};
use crate::pubkey::Pubkey;

// ---------------------------------------------------------------------------
// Well-known program ids
// ---------------------------------------------------------------------------

/// System Program: 32 zero bytes, `11111111111111111111111111111111`.
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::ZERO;

/// SPL Token Program: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`.
/// Base58 cannot be decoded in a const context, so the raw bytes are
/// inlined; the tests pin them to the Base58 form.
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79,
    0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff,
    0x00, 0xa9,
]);

/// Associated Token Account Program:
/// `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d,
    0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9,
    0xf8, 0x59,
]);

/// SPL Token `Transfer` instruction discriminator.
const SPL_TRANSFER: u8 = 3;

/// ATA program `CreateIdempotent` discriminator. The idempotent variant is
/// a no-op when the account already exists, which is what the pessimistic
/// existence fallback relies on.
const ATA_CREATE_IDEMPOTENT: u8 = 1;

/// System Program `Transfer` instruction index (little-endian u32).
const SYSTEM_TRANSFER: u32 = 2;

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build an SPL Token `Transfer` instruction moving `amount` base units
/// from one token account to another.
///
/// `owner` is the wallet that owns `source` and must sign. Data layout:
/// one discriminator byte (3) followed by the amount as u64 LE, 9 bytes
/// in all.
pub fn spl_token_transfer(
    source: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Result<Instruction, WireError> {
    if amount == 0 {
        return Err(WireError::Compile("transfer amount must be > 0".into()));
    }

    let mut data = Vec::with_capacity(9);
    data.push(SPL_TRANSFER);
    data.extend_from_slice(&amount.to_le_bytes());

    Ok(Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountRef::writable(*source),
            AccountRef::writable(*destination),
            AccountRef::signer_readonly(*owner),
        ],
        data,
    })
}

/// Build an idempotent create instruction for `owner`'s associated token
/// account under `mint`, funded by `payer`.
///
/// Safe to include when the account may already exist on-chain.
pub fn create_associated_account(
    payer: &Pubkey,
    associated_account: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountRef::signer_writable(*payer),
            AccountRef::writable(*associated_account),
            AccountRef::readonly(*owner),
            AccountRef::readonly(*mint),
            AccountRef::readonly(SYSTEM_PROGRAM_ID),
            AccountRef::readonly(TOKEN_PROGRAM_ID),
        ],
        data: vec![ATA_CREATE_IDEMPOTENT],
    }
}

/// Build a System Program `Transfer` moving `lamports` of native SOL.
pub fn system_transfer(
    from: &Pubkey,
    to: &Pubkey,
    lamports: u64,
) -> Result<Instruction, WireError> {
    if lamports == 0 {
        return Err(WireError::Compile("lamports must be > 0".into()));
    }

    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Ok(Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            AccountRef::signer_writable(*from),
            AccountRef::writable(*to),
        ],
        data,
    })
}
