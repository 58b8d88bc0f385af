//! Channel error types.

use std::io;

use boxwire_crypto::CryptoError;
use thiserror::Error;

/// Errors during the public-key exchange.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The peer did not deliver a full 32-byte public key.
    #[error("peer public key expected: {0}")]
    PeerKeyExpected(#[source] io::Error),

    /// Our public key could not be written in full.
    #[error("cannot send public key: {0}")]
    CannotSendPublicKey(#[source] io::Error),

    /// The exchanged keys do not yield a usable pairing.
    #[error("key agreement failed: {0}")]
    KeyAgreement(#[source] CryptoError),
}

/// Errors on a secure channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Connect, accept, read, or write failed on the underlying stream.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    #[error("handshake failed: {0}")]
    Handshake(#[from] HandshakeError),

    /// Randomness, decryption, or malformed record.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// A record or plaintext exceeds the per-record bound.
    #[error("record too large: {len} bytes, limit is {max}")]
    RecordTooLarge { len: usize, max: usize },

    /// The stream ended inside a record.
    #[error("record truncated: stream ended mid-record")]
    TruncatedRecord,
}

impl ChannelError {
    /// Whether a received record failed authentication.
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Crypto(CryptoError::Decryption))
    }
}
