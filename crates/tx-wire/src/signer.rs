//! Transaction signing.
//!
//! The engine never depends on any particular key-custody SDK. Anything
//! that can produce a 64-byte Ed25519 signature over arbitrary bytes
//! implements [`SigningCapability`] (a locally held key and an external
//! login session look the same from here), and [`sign_transaction`]
//! splices its output into the serialized transaction.

use ed25519_dalek::Signer as _;
use zeroize::Zeroize;

use crate::error::WireError;
use crate::pubkey::Pubkey;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// A capability that signs a byte string and returns a 64-byte Ed25519
/// signature. Implementations must be synchronous and must not perform
/// I/O; key material stays behind the trait.
pub trait SigningCapability {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, WireError>;
}

/// Sign a serialized transaction and fill its first signature slot.
///
/// The message region starts at `1 + 64 * num_required_signatures`: the
/// signature count is a single byte for any transaction this engine
/// produces (more than 127 signers is rejected at compile time). The
/// capability signs everything from that offset to the end; the rest of
/// the buffer is returned byte-for-byte unchanged.
///
/// Only slot 0 is ever written; single-signer transfers are the sole
/// supported shape.
pub fn sign_transaction(
    tx: &[u8],
    capability: &dyn SigningCapability,
) -> Result<Vec<u8>, WireError> {
    let &count_byte = tx
        .first()
        .ok_or_else(|| WireError::Signing("transaction is empty".into()))?;

    if count_byte & 0x80 != 0 {
        return Err(WireError::Signing(
            "multi-byte signature count: more than 127 signers is unsupported".into(),
        ));
    }
    if count_byte == 0 {
        return Err(WireError::Signing(
            "transaction has no signature slots".into(),
        ));
    }

    let message_offset = 1 + SIGNATURE_LEN * count_byte as usize;
    if tx.len() < message_offset {
        return Err(WireError::Signing(format!(
            "transaction too short: {} bytes, signature slots need {message_offset}",
            tx.len()
        )));
    }

    let signature = capability.sign(&tx[message_offset..])?;
    if signature.len() != SIGNATURE_LEN {
        return Err(WireError::Signing(format!(
            "capability returned {} bytes, expected {SIGNATURE_LEN}",
            signature.len()
        )));
    }

    let mut signed = tx.to_vec();
    signed[1..1 + SIGNATURE_LEN].copy_from_slice(&signature);
    Ok(signed)
}

/// Custodial signing with a locally held Ed25519 key.
pub struct LocalSigner {
    key: ed25519_dalek::SigningKey,
}

impl LocalSigner {
    /// Build a signer from a 32-byte Ed25519 seed. The transient seed
    /// copy is wiped once the key is constructed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut seed = *seed;
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);
        seed.zeroize();
        LocalSigner { key }
    }

    /// The public key, i.e. the wallet address this signer controls.
    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.key.verifying_key().to_bytes())
    }
}

impl SigningCapability for LocalSigner {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, WireError> {
        Ok(self.key.sign(message).to_bytes().to_vec())
    }
}
