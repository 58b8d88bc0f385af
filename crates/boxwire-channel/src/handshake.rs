//! Public-key handshake.
//!
//! Each side writes its raw 32-byte X25519 public key, with no framing, and reads the
//! peer's. The order is fixed:
//!
//! - Client: send own key, then read the server's.
//! - Server: read the client's key, generate a key pair, then send own key.
//!
//! Keys are not authenticated. See the crate docs on trust.

use boxwire_crypto::{KeyPair, KEY_LEN};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::connection::SecureStream;
use crate::error::{ChannelError, HandshakeError};
use crate::fingerprint;

/// Handshake progress for one side of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Start,
    /// Own public key written
    KeySent,
    /// Peer public key read
    KeyReceived,
    /// Both keys exchanged, channel usable
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Client,
    Server,
}

struct Progress {
    role: Role,
    state: HandshakeState,
}

impl Progress {
    fn new(role: Role) -> Self {
        Self {
            role,
            state: HandshakeState::Start,
        }
    }

    fn advance(&mut self, next: HandshakeState) {
        debug!("{:?} handshake: {:?} -> {:?}", self.role, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, err: &ChannelError) {
        debug!("{:?} handshake failed in {:?}: {}", self.role, self.state, err);
        self.state = HandshakeState::Failed;
    }
}

/// Run the client side with a freshly generated key pair.
pub async fn client_handshake<S>(stream: S) -> Result<SecureStream<S>, ChannelError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let keypair = KeyPair::generate()?;
    client_handshake_with(stream, keypair).await
}

/// Run the client side with a key pair generated before connecting.
pub async fn client_handshake_with<S>(
    mut stream: S,
    keypair: KeyPair,
) -> Result<SecureStream<S>, ChannelError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut progress = Progress::new(Role::Client);

    let result: Result<SecureStream<S>, ChannelError> = async {
        send_public_key(&mut stream, keypair.public_key()).await?;
        progress.advance(HandshakeState::KeySent);

        let peer_public = receive_public_key(&mut stream).await?;
        progress.advance(HandshakeState::KeyReceived);

        SecureStream::new(stream, &keypair, &peer_public)
    }
    .await;

    finish(progress, result)
}

/// Run the server side on an accepted stream.
///
/// The server's key pair is generated only after the client's key has arrived.
pub async fn server_handshake<S>(mut stream: S) -> Result<SecureStream<S>, ChannelError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut progress = Progress::new(Role::Server);

    let result: Result<SecureStream<S>, ChannelError> = async {
        let peer_public = receive_public_key(&mut stream).await?;
        progress.advance(HandshakeState::KeyReceived);

        let keypair = KeyPair::generate()?;
        send_public_key(&mut stream, keypair.public_key()).await?;
        progress.advance(HandshakeState::KeySent);

        SecureStream::new(stream, &keypair, &peer_public)
    }
    .await;

    finish(progress, result)
}

fn finish<S>(
    mut progress: Progress,
    result: Result<SecureStream<S>, ChannelError>,
) -> Result<SecureStream<S>, ChannelError>
where
    S: AsyncRead + AsyncWrite,
{
    match result {
        Ok(stream) => {
            progress.advance(HandshakeState::Ready);
            debug!(
                "local key {} paired with peer key {}",
                fingerprint(stream.local_public_key()),
                fingerprint(stream.peer_public_key())
            );
            Ok(stream)
        }
        Err(e) => {
            progress.fail(&e);
            Err(e)
        }
    }
}

async fn send_public_key<S>(stream: &mut S, public_key: &[u8; KEY_LEN]) -> Result<(), HandshakeError>
where
    S: AsyncWrite + Unpin,
{
    stream
        .write_all(public_key)
        .await
        .map_err(HandshakeError::CannotSendPublicKey)?;
    stream
        .flush()
        .await
        .map_err(HandshakeError::CannotSendPublicKey)
}

async fn receive_public_key<S>(stream: &mut S) -> Result<[u8; KEY_LEN], HandshakeError>
where
    S: AsyncRead + Unpin,
{
    let mut peer_public = [0u8; KEY_LEN];
    stream
        .read_exact(&mut peer_public)
        .await
        .map_err(HandshakeError::PeerKeyExpected)?;
    Ok(peer_public)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[tokio::test]
    async fn test_handshake_over_duplex() {
        let (client_io, server_io) = duplex(4096);

        let (client, server) = tokio::join!(client_handshake(client_io), server_handshake(server_io));
        let mut client = client.unwrap();
        let mut server = server.unwrap();

        assert_eq!(client.peer_public_key(), server.local_public_key());
        assert_eq!(server.peer_public_key(), client.local_public_key());

        client.write(b"hello from client").await.unwrap();
        let mut buf = [0u8; 64];
        let n = server.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"hello from client");

        server.write(b"hello from server").await.unwrap();
        let n = client.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"hello from server");
    }

    #[tokio::test]
    async fn test_client_sends_key_first() {
        let (client_io, mut raw_server) = duplex(4096);
        let keypair = KeyPair::generate().unwrap();
        let expected = *keypair.public_key();

        let client = tokio::spawn(client_handshake_with(client_io, keypair));

        let mut received = [0u8; KEY_LEN];
        raw_server.read_exact(&mut received).await.unwrap();
        assert_eq!(received, expected);

        let server_keys = KeyPair::generate().unwrap();
        raw_server.write_all(server_keys.public_key()).await.unwrap();

        let stream = client.await.unwrap().unwrap();
        assert_eq!(stream.peer_public_key(), server_keys.public_key());
    }

    #[tokio::test]
    async fn test_server_short_peer_key() {
        let (mut raw_client, server_io) = duplex(4096);

        raw_client.write_all(&[1u8; 10]).await.unwrap();
        drop(raw_client);

        let err = server_handshake(server_io).await.err().unwrap();
        assert!(matches!(
            err,
            ChannelError::Handshake(HandshakeError::PeerKeyExpected(_))
        ));
    }

    #[tokio::test]
    async fn test_client_peer_closes_before_key() {
        let (client_io, mut raw_server) = duplex(4096);

        let client = tokio::spawn(client_handshake(client_io));
        let mut received = [0u8; KEY_LEN];
        raw_server.read_exact(&mut received).await.unwrap();
        drop(raw_server);

        let err = client.await.unwrap().err().unwrap();
        assert!(matches!(
            err,
            ChannelError::Handshake(HandshakeError::PeerKeyExpected(_))
        ));
    }

    #[tokio::test]
    async fn test_client_cannot_send_key() {
        let (client_io, raw_server) = duplex(4096);
        drop(raw_server);

        let err = client_handshake(client_io).await.err().unwrap();
        assert!(matches!(
            err,
            ChannelError::Handshake(HandshakeError::CannotSendPublicKey(_))
        ));
    }

    #[tokio::test]
    async fn test_weak_peer_key_rejected() {
        let (mut raw_client, server_io) = duplex(4096);

        raw_client.write_all(&[0u8; KEY_LEN]).await.unwrap();

        let err = server_handshake(server_io).await.err().unwrap();
        assert!(matches!(
            err,
            ChannelError::Handshake(HandshakeError::KeyAgreement(_))
        ));
    }
}
