//! `hermes register` / `hermes deregister`: announce or withdraw a backend.
//!
//! Sends a single control frame to the broker's registration port, the
//! same message a backend sends when it is enabled or disabled.

use crate::cli::BackendArgs;
use crate::control::client;
use crate::control::frame::{Frame, Op};
use crate::directory::BackendDescriptor;
use crate::error::{HermesError, ProtocolError};
use crate::logging;

/// Build the frame a backend with these settings would send.
pub fn frame_for(args: &BackendArgs, op: Op) -> Result<Frame, ProtocolError> {
    let backend = BackendDescriptor::new(args.address.clone(), args.port, args.id, args.mount.clone());
    let frame = Frame { op, backend };

    // Anything the listener would reject is rejected here.
    Frame::parse(frame.to_string().as_bytes())
}

pub async fn execute(args: BackendArgs, op: Op) -> Result<(), HermesError> {
    logging::init(&args.log_level, logging::resolve_format(false, false));

    let broker = client::parse_broker_address(&args.broker)?;
    let frame = frame_for(&args, op)?;

    client::send(broker, &frame).await?;

    tracing::info!(
        broker = %broker,
        backend = %frame.backend,
        op = %op.as_char(),
        "control frame delivered"
    );
    Ok(())
}
