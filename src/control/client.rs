//! Backend side of the registration protocol.
//!
//! A backend calls [`send`] once when it comes into service (with a
//! register frame) and once when it leaves (with a deregister frame).

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use super::frame::Frame;
use crate::error::{HermesError, ProtocolError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Validate a broker control address of the form `<ip>:<port>`.
pub fn parse_broker_address(raw: &str) -> Result<SocketAddr, ProtocolError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ProtocolError::MissingBrokerAddress);
    }
    raw.parse::<SocketAddr>()
        .map_err(|_| ProtocolError::InvalidBrokerAddress(raw.to_string()))
}

/// Open a connection to the broker, write one frame, and close.
pub async fn send(broker: SocketAddr, frame: &Frame) -> Result<(), HermesError> {
    let mut stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(broker))
        .await
        .map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("connecting to broker {broker} timed out"),
            )
        })??;

    stream.write_all(frame.to_string().as_bytes()).await?;
    stream.shutdown().await?;

    tracing::debug!(broker = %broker, frame = %frame, "control frame sent");
    Ok(())
}
