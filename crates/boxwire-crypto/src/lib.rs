//! Cryptographic primitives for boxwire.
//!
//! This crate provides:
//! - Ephemeral X25519 key pairs, one per connection
//! - Key pairings (local private key + remote public key) that seal and open records
//!
//! # Design
//!
//! A record is `nonce (24 bytes) || ciphertext`, where the ciphertext carries a 16-byte
//! Poly1305 tag. The nonce is drawn fresh from the OS CSPRNG for every record, which is
//! why the extended-nonce XChaCha20-Poly1305 construction is used: random 192-bit nonces
//! never collide in practice.
//!
//! Both peers derive the same symmetric key from the X25519 shared secret, so a record
//! sealed by either side opens on the other.

#![forbid(unsafe_code)]

pub mod error;
pub mod keypair;
pub mod sealed;

pub use error::CryptoError;
pub use keypair::KeyPair;
pub use sealed::KeyPairing;

/// Length of an X25519 public or private key.
pub const KEY_LEN: usize = 32;

/// Length of the per-record nonce.
pub const NONCE_LEN: usize = 24;

/// Length of the Poly1305 authentication tag.
pub const TAG_LEN: usize = 16;

/// Bytes a sealed record adds on top of its plaintext.
pub const RECORD_OVERHEAD: usize = NONCE_LEN + TAG_LEN;
