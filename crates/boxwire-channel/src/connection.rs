//! Secure connection: a Secure Reader and Secure Writer over one stream.

use boxwire_crypto::{KeyPair, KEY_LEN};
use tokio::io::{split, AsyncRead, AsyncWrite, ReadHalf, WriteHalf};

use crate::error::{ChannelError, HandshakeError};
use crate::reader::SecureReader;
use crate::writer::SecureWriter;

/// Bidirectional, closable secure channel.
///
/// The reader and writer halves each own a copy of the key pairing and share no
/// mutable state, so they can be [`split`](Self::split) and driven from different tasks.
pub struct SecureStream<S> {
    reader: SecureReader<ReadHalf<S>>,
    writer: SecureWriter<WriteHalf<S>>,
    local_public: [u8; KEY_LEN],
    peer_public: [u8; KEY_LEN],
}

impl<S: AsyncRead + AsyncWrite> SecureStream<S> {
    /// Bind `stream` to our key pair and the peer's public key.
    ///
    /// Only valid once both public keys have been exchanged.
    pub fn new(
        stream: S,
        keypair: &KeyPair,
        peer_public: &[u8; KEY_LEN],
    ) -> Result<Self, ChannelError> {
        let pairing = keypair
            .pairing(peer_public)
            .map_err(HandshakeError::KeyAgreement)?;

        let (read_half, write_half) = split(stream);
        Ok(Self {
            reader: SecureReader::with_pairing(read_half, pairing.clone()),
            writer: SecureWriter::with_pairing(write_half, pairing),
            local_public: *keypair.public_key(),
            peer_public: *peer_public,
        })
    }

    /// Read the next record's plaintext into `buf`. See [`SecureReader::read`].
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ChannelError> {
        self.reader.read(buf).await
    }

    /// Read the next whole record. See [`SecureReader::read_record`].
    pub async fn read_record(&mut self) -> Result<Option<Vec<u8>>, ChannelError> {
        self.reader.read_record().await
    }

    /// Seal and send `buf` as one record. See [`SecureWriter::write`].
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize, ChannelError> {
        self.writer.write(buf).await
    }

    /// Our public key for this connection.
    pub fn local_public_key(&self) -> &[u8; KEY_LEN] {
        &self.local_public
    }

    /// The public key the peer sent during the handshake.
    pub fn peer_public_key(&self) -> &[u8; KEY_LEN] {
        &self.peer_public
    }

    /// Split into independently owned reader and writer.
    pub fn split(self) -> (SecureReader<ReadHalf<S>>, SecureWriter<WriteHalf<S>>) {
        (self.reader, self.writer)
    }

    /// Close the connection.
    ///
    /// Shuts down the write side, then releases the stream. The shutdown error, if
    /// any, is returned after the stream has been released.
    pub async fn close(self) -> Result<(), ChannelError> {
        let Self {
            reader, mut writer, ..
        } = self;

        let result = writer.shutdown().await;
        drop(reader);
        drop(writer);
        result
    }
}
