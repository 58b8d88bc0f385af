//! Length-prefixed framing for sealed records.
//!
//! TCP may split or coalesce writes, so each record travels behind a length header:
//!
//! ```text
//! [4 bytes: record length, big-endian] [24 bytes: nonce] [ciphertext + 16-byte tag]
//! ```
//!
//! The length covers nonce and ciphertext, never the header itself.

use std::io;

use boxwire_crypto::{CryptoError, RECORD_OVERHEAD};
use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::ChannelError;

/// Largest plaintext a single record carries.
pub const MAX_PLAINTEXT_LEN: usize = 32 * 1024;

/// Largest record (nonce + ciphertext + tag) accepted on the wire.
pub const MAX_RECORD_LEN: usize = MAX_PLAINTEXT_LEN + RECORD_OVERHEAD;

/// Size of the length header.
pub const LEN_HEADER_SIZE: usize = 4;

/// Prefix a sealed record with its length header.
pub fn encode(record: &[u8]) -> Result<Bytes, ChannelError> {
    if record.len() > MAX_RECORD_LEN {
        return Err(ChannelError::RecordTooLarge {
            len: record.len(),
            max: MAX_RECORD_LEN,
        });
    }

    let mut buf = BytesMut::with_capacity(LEN_HEADER_SIZE + record.len());
    buf.put_u32(record.len() as u32);
    buf.extend_from_slice(record);
    Ok(buf.freeze())
}

/// Read one framed record.
///
/// Returns `Ok(None)` when the stream ends cleanly on a record boundary.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, ChannelError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; LEN_HEADER_SIZE];
    let mut filled = 0;
    while filled < LEN_HEADER_SIZE {
        let n = reader.read(&mut header[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(ChannelError::TruncatedRecord);
        }
        filled += n;
    }

    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_RECORD_LEN {
        return Err(ChannelError::RecordTooLarge {
            len,
            max: MAX_RECORD_LEN,
        });
    }
    if len < RECORD_OVERHEAD {
        return Err(CryptoError::RecordTooShort {
            len,
            min: RECORD_OVERHEAD,
        }
        .into());
    }

    let mut record = vec![0u8; len];
    match reader.read_exact(&mut record).await {
        Ok(_) => Ok(Some(record)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(ChannelError::TruncatedRecord),
        Err(e) => Err(e.into()),
    }
}
