//! Secure Reader: opens one sealed record per read.

use boxwire_crypto::{KeyPairing, KEY_LEN};
use tokio::io::AsyncRead;
use tracing::trace;

use crate::error::ChannelError;
use crate::frame;

/// Decrypting reader over an underlying byte stream.
///
/// Each call consumes exactly one framed record. Records that fail authentication are
/// reported as errors and never produce plaintext.
pub struct SecureReader<R> {
    inner: R,
    pairing: KeyPairing,
}

impl<R: AsyncRead + Unpin> SecureReader<R> {
    /// Create a reader from our private key and the peer's public key.
    pub fn new(
        inner: R,
        private_key: &[u8; KEY_LEN],
        peer_public: &[u8; KEY_LEN],
    ) -> Result<Self, ChannelError> {
        let pairing = KeyPairing::new(private_key, peer_public)?;
        Ok(Self::with_pairing(inner, pairing))
    }

    /// Create a reader from an existing pairing.
    pub fn with_pairing(inner: R, pairing: KeyPairing) -> Self {
        Self { inner, pairing }
    }

    /// Read and open the next record.
    ///
    /// Returns `Ok(None)` at end-of-stream. An empty record yields `Some` of an empty vec,
    /// which keeps it distinguishable from end-of-stream.
    pub async fn read_record(&mut self) -> Result<Option<Vec<u8>>, ChannelError> {
        let Some(record) = frame::read_frame(&mut self.inner).await? else {
            return Ok(None);
        };

        let plaintext = self.pairing.open(&record)?;
        Ok(Some(plaintext))
    }

    /// Read the next record's plaintext into `buf`.
    ///
    /// Returns the number of bytes copied, `0` at end-of-stream. A plaintext longer than
    /// `buf` is truncated; the rest of that record is discarded.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ChannelError> {
        let Some(plaintext) = self.read_record().await? else {
            return Ok(0);
        };

        let n = plaintext.len().min(buf.len());
        if n < plaintext.len() {
            trace!(
                "record truncated to caller buffer: {} of {} bytes",
                n,
                plaintext.len()
            );
        }
        buf[..n].copy_from_slice(&plaintext[..n]);
        Ok(n)
    }

    /// Get a reference to the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consume the reader, returning the underlying stream.
    ///
    /// Bytes of a record not yet read stay in the stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}
