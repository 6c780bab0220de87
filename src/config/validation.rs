//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for unusable
//! values: unparseable hosts, zero ports, the HTTP and control listeners
//! colliding on one socket, and a zero timeout or body limit. Returns a
//! list of [`ValidationError`] values with per-field suggestions.

use std::net::IpAddr;

use super::model::Config;
use crate::error::ValidationError;

/// Validate a listen host. Returns `Ok(())` or a human-readable error.
pub fn validate_host(host: &str) -> Result<(), String> {
    if host.is_empty() {
        return Err("host cannot be empty".into());
    }
    host.parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| format!("'{host}' is not an IP address"))
}

fn error(field: &str, message: String, suggestion: Option<&str>) -> ValidationError {
    ValidationError {
        field: field.into(),
        message,
        suggestion: suggestion.map(String::from),
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_host(&config.listen.host) {
        errors.push(error("listen.host", msg, Some("use 0.0.0.0 to listen on all interfaces")));
    }
    if let Err(msg) = validate_host(&config.control.host) {
        errors.push(error("control.host", msg, Some("use 0.0.0.0 to listen on all interfaces")));
    }

    if config.listen.port == 0 {
        errors.push(error("listen.port", "port cannot be 0".into(), None));
    }
    if config.control.port == 0 {
        errors.push(error("control.port", "port cannot be 0".into(), None));
    }

    if config.listen.port != 0
        && config.listen.port == config.control.port
        && config.listen.host == config.control.host
    {
        errors.push(error(
            "control.port",
            format!(
                "control listener collides with the HTTP listener on port {}",
                config.listen.port
            ),
            Some("backends conventionally register on 9000"),
        ));
    }

    if config.forward.timeout == 0 {
        errors.push(error(
            "forward.timeout",
            "timeout must be greater than 0 ms".into(),
            Some("an unresponsive backend would block its request forever"),
        ));
    }
    if config.forward.max_body == 0 {
        errors.push(error(
            "forward.max_body",
            "max_body must be greater than 0 bytes".into(),
            None,
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Format a human-readable summary of a validated config.
#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    format!(
        "{path} is valid\n  http:    {}:{}\n  control: {}:{}\n  timeout: {}ms, max body {} bytes",
        config.listen.host,
        config.listen.port,
        config.control.host,
        config.control.port,
        config.forward.timeout,
        config.forward.max_body,
    )
}
