//! Concrete file-backed config sources.
//!
//! Provides [`FileSource`](file_source::FileSource) constructors for
//! YAML, JSON, and TOML gated by feature flags, [`for_path`] to pick one
//! by extension, and [`parse_config_str`] for format-specific
//! deserialization of an in-memory string.

pub mod file_source;

#[cfg(feature = "yaml")]
pub mod yaml;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "toml")]
pub mod toml_source;

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::config::model::Config;
use crate::error::HermesError;
use file_source::FileSource;

/// File names probed in the working directory when no `--config` is given.
pub const AUTO_DETECT_CANDIDATES: &[&str] =
    &["hermes.yaml", "hermes.yml", "hermes.json", "hermes.toml"];

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, HermesError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| HermesError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| HermesError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| HermesError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(HermesError::UnsupportedFormat(other.to_string())),
    }
}

/// Pick the file source matching the path's extension.
pub fn for_path(path: &Path) -> Result<FileSource, HermesError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(yaml::new(path.to_path_buf())),

        #[cfg(feature = "json")]
        "json" => Ok(json::new(path.to_path_buf())),

        #[cfg(feature = "toml")]
        "toml" => Ok(toml_source::new(path.to_path_buf())),

        other => Err(HermesError::UnsupportedFormat(other.to_string())),
    }
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_is_lowercase_hex() {
        let digest = sha256_hex(b"hermes");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(matches!(
            parse_config_str("ini", "", "hermes.ini"),
            Err(HermesError::UnsupportedFormat(ext)) if ext == "ini"
        ));
        assert!(for_path(Path::new("hermes.ini")).is_err());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_overrides_only_given_fields() {
        let config = parse_config_str("yaml", "control:\n  port: 9100\n", "inline").unwrap();
        assert_eq!(config.control.port, 9100);
        assert_eq!(config.control.host, "0.0.0.0");
        assert_eq!(config.listen.port, 8080);
        assert_eq!(config.forward.timeout, 5000);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_rejects_unknown_fields() {
        assert!(parse_config_str("yaml", "routes: []\n", "inline").is_err());
    }
}
