//! Unified error types for Hermes.
//!
//! Defines [`HermesError`] (the main crate error enum),
//! [`ProtocolError`] for malformed control frames and broker address
//! settings, and [`ValidationError`] for config validation failures.
//! Error messages include contextual hints to guide the user toward a fix.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

/// A control frame or broker address that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ProtocolError {
    #[error("empty control frame")]
    Empty,

    #[error("control frame is not ASCII text")]
    NotAscii,

    #[error("expected 5 colon-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("unknown opcode '{0}' (expected '+' or '-')")]
    UnknownOp(String),

    #[error("backend address is empty")]
    EmptyAddress,

    #[error("port is not a number: '{0}'")]
    InvalidPort(String),

    #[error("id is not a number: '{0}'")]
    InvalidId(String),

    #[error("mount path must be '/' followed by a name: '{0}'")]
    InvalidMountPath(String),

    #[error("the broker's address is not defined")]
    MissingBrokerAddress,

    #[error("broker address must be <ip>:<port>, got '{0}'")]
    InvalidBrokerAddress(String),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HermesError {
    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Control protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_listed_one_per_line() {
        let err = HermesError::ConfigValidation {
            errors: vec![
                ValidationError {
                    field: "listen.port".into(),
                    message: "port cannot be 0".into(),
                    suggestion: None,
                },
                ValidationError {
                    field: "forward.timeout".into(),
                    message: "timeout must be positive".into(),
                    suggestion: Some("try 5000".into()),
                },
            ],
        };

        let rendered = err.to_string();
        assert!(rendered.contains("  listen.port: port cannot be 0\n"));
        assert!(rendered.ends_with("forward.timeout: timeout must be positive (try 5000)"));
    }

    #[test]
    fn protocol_error_wraps_into_crate_error() {
        let err: HermesError = ProtocolError::InvalidPort("xx".into()).into();
        assert_eq!(
            err.to_string(),
            "Control protocol error: port is not a number: 'xx'"
        );
    }
}
