use thiserror::Error;

/// Wire-format construction and signing errors.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed compiler input: zero fee payer, account missing from the
    /// key table, empty instruction list.
    #[error("compile error: {0}")]
    Compile(String),

    /// A count or length exceeds what the wire encoding can represent, or
    /// a compact-u16 value failed to decode.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The signing capability rejected the message or returned something
    /// other than a 64-byte signature.
    #[error("signing error: {0}")]
    Signing(String),
}
