//! Background acceptor for the registration protocol.
//!
//! [`run`] accepts one connection at a time, reads a single frame of at
//! most [`MAX_FRAME_LEN`] bytes, applies it to the [`Directory`], and
//! closes the connection. Bad frames and socket errors are logged; the
//! loop keeps accepting until the shutdown channel fires.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};

use super::frame::{Frame, Op, MAX_FRAME_LEN};
use crate::directory::{Directory, RegisterOutcome};
use crate::error::ProtocolError;

/// How long a peer may stay silent after connecting.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn run(
    listener: TcpListener,
    directory: Arc<Directory>,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) {
    loop {
        let accepted = tokio::select! {
            accepted = listener.accept() => accepted,
            _ = shutdown.changed() => {
                tracing::debug!("control listener shutting down");
                return;
            }
        };

        match accepted {
            Ok((stream, peer)) => handle_connection(stream, peer, &directory).await,
            Err(e) => {
                // EMFILE and aborted handshakes are transient; keep accepting.
                tracing::error!(error = %e, "control listener accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

async fn handle_connection(mut stream: TcpStream, peer: SocketAddr, directory: &Directory) {
    let mut buf = [0u8; MAX_FRAME_LEN];
    let count = match tokio::time::timeout(READ_TIMEOUT, stream.read(&mut buf)).await {
        Ok(Ok(count)) => count,
        Ok(Err(e)) => {
            tracing::warn!(peer = %peer, error = %e, "control read failed");
            return;
        }
        Err(_) => {
            tracing::warn!(peer = %peer, "control peer sent nothing, dropping");
            return;
        }
    };

    if count == 0 {
        tracing::debug!(peer = %peer, "control connection closed without a frame");
        return;
    }

    if let Err(e) = apply_frame(&buf[..count], directory) {
        tracing::warn!(peer = %peer, error = %e, "malformed control frame");
    }
}

/// Parse one raw frame and apply it to the directory.
pub fn apply_frame(raw: &[u8], directory: &Directory) -> Result<Op, ProtocolError> {
    let Frame { op, backend } = Frame::parse(raw)?;

    match op {
        Op::Register => match directory.register(backend.clone()) {
            RegisterOutcome::Added => {
                tracing::info!(
                    id = backend.id,
                    address = %backend.address,
                    port = backend.port,
                    mount = %backend.mount_path,
                    "backend registered"
                );
            }
            RegisterOutcome::Duplicate => {
                tracing::debug!(backend = %backend, "backend already registered");
            }
        },
        Op::Deregister => {
            if directory.deregister(&backend) {
                tracing::info!(
                    address = %backend.address,
                    port = backend.port,
                    "backend removed"
                );
            } else {
                tracing::warn!(
                    address = %backend.address,
                    port = backend.port,
                    "backend is not registered"
                );
            }
        }
    }

    Ok(op)
}
