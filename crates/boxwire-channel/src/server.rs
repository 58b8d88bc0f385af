//! Secure echo server.
//!
//! One accept loop, one task per accepted connection. Each task runs the server
//! handshake and then echoes records until the peer finishes or fails. Connections
//! share no state; a failing connection only ends its own task.

use std::future::Future;
use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, info_span, trace, warn, Instrument};

use crate::connection::SecureStream;
use crate::error::ChannelError;
use crate::handshake::server_handshake;

/// Serve the secure echo protocol until accepting fails.
///
/// Accept errors end the loop and are returned. Per-connection errors are logged.
pub async fn serve(listener: TcpListener) -> Result<(), ChannelError> {
    serve_with_shutdown(listener, std::future::pending()).await
}

/// Serve until accepting fails or `shutdown` resolves.
///
/// Connections already being served keep running after shutdown.
pub async fn serve_with_shutdown<F>(listener: TcpListener, shutdown: F) -> Result<(), ChannelError>
where
    F: Future<Output = ()>,
{
    info!("secure echo server listening on {}", listener.local_addr()?);
    tokio::pin!(shutdown);

    let mut next_conn_id: u64 = 0;
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = accepted?;
                next_conn_id += 1;

                let span = info_span!("conn", id = next_conn_id, %peer);
                tokio::spawn(handle_connection(socket, peer).instrument(span));
            }
            _ = &mut shutdown => {
                info!("shutdown requested, no longer accepting connections");
                return Ok(());
            }
        }
    }
}

async fn handle_connection(socket: TcpStream, peer: SocketAddr) {
    if let Err(e) = socket.set_nodelay(true) {
        debug!("failed to set TCP_NODELAY: {}", e);
    }

    let stream = match server_handshake(socket).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("handshake with {} failed: {}", peer, e);
            return;
        }
    };

    match echo(stream).await {
        Ok(echoed) => info!("connection from {} closed after echoing {} bytes", peer, echoed),
        Err(e) => warn!("connection from {} ended: {}", peer, e),
    }
}

/// Echo every record back to the sender until end-of-stream or error.
///
/// The stream is closed on every exit path. Returns the number of plaintext bytes
/// echoed. A copy error takes precedence over a close error.
pub async fn echo<S>(mut stream: SecureStream<S>) -> Result<u64, ChannelError>
where
    S: AsyncRead + AsyncWrite,
{
    let copied = copy_records(&mut stream).await;
    let closed = stream.close().await;

    let echoed = copied?;
    closed?;
    Ok(echoed)
}

async fn copy_records<S>(stream: &mut SecureStream<S>) -> Result<u64, ChannelError>
where
    S: AsyncRead + AsyncWrite,
{
    let mut echoed = 0u64;
    while let Some(plaintext) = stream.read_record().await? {
        stream.write(&plaintext).await?;
        echoed += plaintext.len() as u64;
        trace!("echoed {} byte record", plaintext.len());
    }
    Ok(echoed)
}
