//! Secure echo channel for boxwire.
//!
//! This crate provides:
//! - An unauthenticated X25519 public-key handshake over any byte stream
//! - [`SecureReader`] / [`SecureWriter`] that open and seal one record per call
//! - [`SecureStream`], the closable pairing of both over one connection
//! - A TCP echo server loop and a one-shot client
//!
//! # Flow
//!
//! ```text
//! Client                                   Server
//!   |  generate key pair                     |
//!   |  connect                               |  accept
//!   |  -> client public key (32 bytes)       |
//!   |--------------------------------------->|  generate key pair
//!   |  <- server public key (32 bytes)       |
//!   |<---------------------------------------|
//!   [   sealed records in both directions    ]
//! ```
//!
//! # Trust
//!
//! Public keys are accepted on first use. Nothing binds a key to an identity, so an
//! active man-in-the-middle can substitute its own keys. Callers that need identity
//! must check [`SecureStream::peer_public_key`] against a trust anchor of their own
//! before relying on the channel.

#![forbid(unsafe_code)]

pub mod client;
pub mod connection;
pub mod error;
pub mod frame;
pub mod handshake;
pub mod reader;
pub mod server;
pub mod writer;

pub use client::{dial, send_message};
pub use connection::SecureStream;
pub use error::{ChannelError, HandshakeError};
pub use handshake::{client_handshake, client_handshake_with, server_handshake, HandshakeState};
pub use reader::SecureReader;
pub use server::{echo, serve, serve_with_shutdown};
pub use writer::SecureWriter;

/// Short hex fingerprint of a public key for logs.
pub fn fingerprint(public_key: &[u8; boxwire_crypto::KEY_LEN]) -> String {
    hex::encode(&public_key[..8])
}
