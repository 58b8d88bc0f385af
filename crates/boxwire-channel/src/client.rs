//! Secure echo client.

use boxwire_crypto::KeyPair;
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

use crate::connection::SecureStream;
use crate::error::ChannelError;
use crate::handshake::client_handshake_with;

/// Generate a key pair, connect to `addr`, and run the client handshake.
pub async fn dial<A: ToSocketAddrs>(addr: A) -> Result<SecureStream<TcpStream>, ChannelError> {
    let keypair = KeyPair::generate()?;

    let socket = TcpStream::connect(addr).await?;
    socket.set_nodelay(true)?;
    debug!("connected to {}", socket.peer_addr()?);

    client_handshake_with(socket, keypair).await
}

/// Send one message and return the echoed reply.
///
/// The reply is read once into a buffer sized to `message`. End-of-stream before a
/// reply is not an error; it yields an empty reply.
pub async fn send_message<A: ToSocketAddrs>(
    addr: A,
    message: &[u8],
) -> Result<Vec<u8>, ChannelError> {
    let mut stream = dial(addr).await?;

    stream.write(message).await?;

    let mut reply = vec![0u8; message.len()];
    let n = stream.read(&mut reply).await?;
    reply.truncate(n);

    if let Err(e) = stream.close().await {
        debug!("close after reply failed: {}", e);
    }

    Ok(reply)
}
