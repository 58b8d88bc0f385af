//! Crypto error types.

use thiserror::Error;

/// Errors from key generation and record sealing/opening.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The OS randomness source could not supply bytes.
    #[error("randomness source unavailable: {0}")]
    Randomness(String),

    /// A record failed authentication. No plaintext is released.
    #[error("decryption failed: record did not authenticate")]
    Decryption,

    /// A record is too short to hold a nonce and a tag.
    #[error("record too short: {len} bytes, need at least {min}")]
    RecordTooShort { len: usize, min: usize },

    /// The peer's public key produced a non-contributory shared secret.
    #[error("weak peer public key")]
    WeakPeerKey,

    #[error("key derivation failed")]
    KeyDerivation,

    #[error("encryption failed")]
    Encryption,
}

impl CryptoError {
    /// Create a randomness error from any displayable type.
    pub fn randomness(msg: impl std::fmt::Display) -> Self {
        Self::Randomness(msg.to_string())
    }
}
