//! Control frame schema and its validating parser.
//!
//! A frame is one line of ASCII text, `op:address:port:id:mountPath`,
//! sent as the only payload of a TCP connection. [`Frame::parse`] is the
//! single entry point turning raw bytes into a typed frame; `Display`
//! renders the wire form used by the registration client.

use std::fmt;

use crate::directory::BackendDescriptor;
use crate::error::ProtocolError;

/// Size of the listener's receive buffer. Longer frames are truncated.
pub const MAX_FRAME_LEN: usize = 256;

const FIELD_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Register,
    Deregister,
}

impl Op {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Register => '+',
            Self::Deregister => '-',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub op: Op,
    pub backend: BackendDescriptor,
}

impl Frame {
    #[must_use]
    pub const fn register(backend: BackendDescriptor) -> Self {
        Self {
            op: Op::Register,
            backend,
        }
    }

    #[must_use]
    pub const fn deregister(backend: BackendDescriptor) -> Self {
        Self {
            op: Op::Deregister,
            backend,
        }
    }

    pub fn parse(raw: &[u8]) -> Result<Self, ProtocolError> {
        if !raw.is_ascii() {
            return Err(ProtocolError::NotAscii);
        }
        // ASCII is valid UTF-8, so this never falls back.
        let text = String::from_utf8_lossy(raw);
        let text = text.trim_end_matches(|c: char| c.is_ascii_whitespace() || c == '\0');
        if text.is_empty() {
            return Err(ProtocolError::Empty);
        }

        let fields: Vec<&str> = text.split(':').collect();
        if fields.len() != FIELD_COUNT {
            return Err(ProtocolError::FieldCount {
                found: fields.len(),
            });
        }

        let op = match fields[0] {
            "+" => Op::Register,
            "-" => Op::Deregister,
            other => return Err(ProtocolError::UnknownOp(other.to_string())),
        };

        let address = fields[1];
        if address.is_empty() {
            return Err(ProtocolError::EmptyAddress);
        }

        let port = fields[2]
            .parse::<u16>()
            .map_err(|_| ProtocolError::InvalidPort(fields[2].to_string()))?;
        let id = fields[3]
            .parse::<u32>()
            .map_err(|_| ProtocolError::InvalidId(fields[3].to_string()))?;

        let mount_path = fields[4];
        if !mount_path.starts_with('/') || mount_path.trim_start_matches('/').is_empty() {
            return Err(ProtocolError::InvalidMountPath(mount_path.to_string()));
        }

        Ok(Self {
            op,
            backend: BackendDescriptor::new(address, port, id, mount_path),
        })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.backend;
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.op.as_char(),
            b.address,
            b.port,
            b.id,
            b.mount_path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_register_frame() {
        let frame = Frame::parse(b"+:127.0.0.1:8081:1:/default").unwrap();
        assert_eq!(frame.op, Op::Register);
        assert_eq!(
            frame.backend,
            BackendDescriptor::new("127.0.0.1", 8081, 1, "/default")
        );
    }

    #[test]
    fn parses_deregister_frame_with_trailing_newline() {
        let frame = Frame::parse(b"-:10.1.2.3:9090:7:/media\r\n").unwrap();
        assert_eq!(frame.op, Op::Deregister);
        assert_eq!(frame.backend.mount_path, "/media");
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert_eq!(
            Frame::parse(b"+:bad:xx:1:/default"),
            Err(ProtocolError::InvalidPort("xx".into()))
        );
    }

    #[test]
    fn rejects_non_numeric_id() {
        assert_eq!(
            Frame::parse(b"+:127.0.0.1:8081:one:/default"),
            Err(ProtocolError::InvalidId("one".into()))
        );
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            Frame::parse(b"+:127.0.0.1:8081"),
            Err(ProtocolError::FieldCount { found: 3 })
        );
        // IPv6 literals collide with the delimiter.
        assert_eq!(
            Frame::parse(b"+:::1:8081:1:/default"),
            Err(ProtocolError::FieldCount { found: 7 })
        );
    }

    #[test]
    fn rejects_unknown_op_and_bad_fields() {
        assert_eq!(
            Frame::parse(b"*:127.0.0.1:8081:1:/default"),
            Err(ProtocolError::UnknownOp("*".into()))
        );
        assert_eq!(
            Frame::parse(b"+::8081:1:/default"),
            Err(ProtocolError::EmptyAddress)
        );
        assert_eq!(
            Frame::parse(b"+:127.0.0.1:8081:1:default"),
            Err(ProtocolError::InvalidMountPath("default".into()))
        );
        assert_eq!(
            Frame::parse(b"+:127.0.0.1:8081:1:/"),
            Err(ProtocolError::InvalidMountPath("/".into()))
        );
        assert_eq!(Frame::parse(b"\0\0\n"), Err(ProtocolError::Empty));
        assert_eq!(
            Frame::parse("+:h\u{f6}st:1:1:/a".as_bytes()),
            Err(ProtocolError::NotAscii)
        );
    }

    #[test]
    fn accepts_nested_mount() {
        let frame = Frame::parse(b"+:127.0.0.1:8081:1:/media/videos").unwrap();
        assert_eq!(frame.backend.mount_path, "/media/videos");
    }

    #[test]
    fn display_produces_wire_form() {
        let frame = Frame::deregister(BackendDescriptor::new("192.168.0.4", 8081, 0, "/default"));
        assert_eq!(frame.to_string(), "-:192.168.0.4:8081:0:/default");
        assert_eq!(Frame::parse(frame.to_string().as_bytes()).unwrap(), frame);
    }
}
