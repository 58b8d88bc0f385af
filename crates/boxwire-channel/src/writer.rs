//! Secure Writer: seals one record per write.

use boxwire_crypto::{KeyPairing, KEY_LEN};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::ChannelError;
use crate::frame::{self, MAX_PLAINTEXT_LEN};

/// Encrypting writer over an underlying byte stream.
///
/// Every call to [`write`](Self::write) produces one self-contained record under a fresh
/// random nonce. Nothing is buffered across calls.
pub struct SecureWriter<W> {
    inner: W,
    pairing: KeyPairing,
}

impl<W: AsyncWrite + Unpin> SecureWriter<W> {
    /// Create a writer from our private key and the peer's public key.
    pub fn new(
        inner: W,
        private_key: &[u8; KEY_LEN],
        peer_public: &[u8; KEY_LEN],
    ) -> Result<Self, ChannelError> {
        let pairing = KeyPairing::new(private_key, peer_public)?;
        Ok(Self::with_pairing(inner, pairing))
    }

    /// Create a writer from an existing pairing.
    pub fn with_pairing(inner: W, pairing: KeyPairing) -> Self {
        Self { inner, pairing }
    }

    /// Seal `buf` into one record and write it out.
    ///
    /// Returns the number of bytes the stream accepted for the whole framed record,
    /// not the plaintext length. Plaintexts above [`MAX_PLAINTEXT_LEN`] are rejected
    /// before anything is written.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize, ChannelError> {
        if buf.len() > MAX_PLAINTEXT_LEN {
            return Err(ChannelError::RecordTooLarge {
                len: buf.len(),
                max: MAX_PLAINTEXT_LEN,
            });
        }

        let record = self.pairing.seal(buf)?;
        let framed = frame::encode(&record)?;

        self.inner.write_all(&framed).await?;
        self.inner.flush().await?;
        Ok(framed.len())
    }

    /// Flush the underlying stream.
    ///
    /// [`write`](Self::write) already flushes each record; this is for callers that
    /// wrote to the stream by other means.
    pub async fn flush(&mut self) -> Result<(), ChannelError> {
        self.inner.flush().await?;
        Ok(())
    }

    /// Shut down the write side of the underlying stream.
    pub async fn shutdown(&mut self) -> Result<(), ChannelError> {
        self.inner.shutdown().await?;
        Ok(())
    }

    /// Get a reference to the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the writer, returning the underlying stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::LEN_HEADER_SIZE;
    use boxwire_crypto::{KeyPair, NONCE_LEN, RECORD_OVERHEAD};

    fn writer() -> SecureWriter<Vec<u8>> {
        let local = KeyPair::generate().unwrap();
        let peer = KeyPair::generate().unwrap();
        SecureWriter::new(Vec::new(), &local.private_key_bytes(), peer.public_key()).unwrap()
    }

    #[tokio::test]
    async fn test_reports_framed_record_length() {
        let mut writer = writer();

        let n = writer.write(b"hello").await.unwrap();
        assert_eq!(n, LEN_HEADER_SIZE + RECORD_OVERHEAD + 5);
        assert_eq!(writer.get_ref().len(), n);
    }

    #[tokio::test]
    async fn test_fresh_nonce_per_write() {
        let mut writer = writer();

        let first = writer.write(b"same").await.unwrap();
        writer.write(b"same").await.unwrap();

        let wire = writer.into_inner();
        let nonce_a = &wire[LEN_HEADER_SIZE..LEN_HEADER_SIZE + NONCE_LEN];
        let nonce_b = &wire[first + LEN_HEADER_SIZE..first + LEN_HEADER_SIZE + NONCE_LEN];
        assert_ne!(nonce_a, nonce_b);
    }

    #[tokio::test]
    async fn test_oversize_plaintext_rejected() {
        let mut writer = writer();

        let big = vec![0u8; MAX_PLAINTEXT_LEN + 1];
        let err = writer.write(&big).await.unwrap_err();

        assert!(matches!(err, ChannelError::RecordTooLarge { .. }));
        assert!(writer.get_ref().is_empty());
    }

    #[tokio::test]
    async fn test_flush_reaches_peer() {
        let local = KeyPair::generate().unwrap();
        let peer = KeyPair::generate().unwrap();
        let (near, far) = tokio::io::duplex(4096);

        let mut writer = SecureWriter::with_pairing(
            tokio::io::BufWriter::new(near),
            local.pairing(peer.public_key()).unwrap(),
        );
        writer.write(b"buffered").await.unwrap();
        writer.flush().await.unwrap();

        let mut reader =
            crate::SecureReader::with_pairing(far, peer.pairing(local.public_key()).unwrap());
        assert_eq!(reader.read_record().await.unwrap().unwrap(), b"buffered");
    }

    #[tokio::test]
    async fn test_flush_on_empty_writer() {
        let mut writer = writer();

        writer.flush().await.unwrap();
        assert!(writer.get_ref().is_empty());
    }

    #[tokio::test]
    async fn test_max_plaintext_accepted() {
        let mut writer = writer();

        let max = vec![0u8; MAX_PLAINTEXT_LEN];
        let n = writer.write(&max).await.unwrap();
        assert_eq!(n, LEN_HEADER_SIZE + MAX_PLAINTEXT_LEN + RECORD_OVERHEAD);
    }
}
