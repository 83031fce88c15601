//! Associated token account derivation.
//!
//! The associated account for an (owner, mint) pair is a Program Derived
//! Address under the ATA program with seeds
//! `[owner, token_program_id, mint]`. A PDA is the first SHA-256 of
//! `seeds || bump || program_id || "ProgramDerivedAddress"` (bump counted
//! down from 255) that does NOT land on the Ed25519 curve, so no private
//! key can ever exist for it.

use sha2::{Digest, Sha256};

use crate::error::WireError;
use crate::instructions::{ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::pubkey::Pubkey;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Derive the associated token account address for `owner` under `mint`.
///
/// Deterministic and pure; the engine treats this as its address
/// derivation primitive.
pub fn derive_associated_token_address(
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<Pubkey, WireError> {
    let (address, _bump) = find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )?;
    Ok(address)
}

/// Search bump seeds 255 down to 0 for the first off-curve derivation.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), WireError> {
    for bump in (0u8..=255).rev() {
        if let Some(address) = try_derive(seeds, bump, program_id) {
            return Ok((address, bump));
        }
    }

    // Statistically unreachable: each bump misses with probability ~1/2.
    Err(WireError::InvalidAddress(
        "no valid bump seed for program address".into(),
    ))
}

fn try_derive(seeds: &[&[u8]], bump: u8, program_id: &Pubkey) -> Option<Pubkey> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return None;
    }
    Some(Pubkey::new(hash))
}

/// Whether 32 bytes decompress to a valid Ed25519 point.
fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
