//! Serde data structures for the Hermes configuration file.
//!
//! Contains [`Config`] (the root), [`ListenConfig`], [`ControlConfig`],
//! and [`ForwardConfig`]. All types derive `Serialize` and `Deserialize`
//! with `deny_unknown_fields` for strict parsing. Every field has a
//! default, so a file only needs the keys it overrides.

use serde::{Deserialize, Serialize};

pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_CONTROL_PORT: u16 = 9000;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}

const fn default_control_port() -> u16 {
    DEFAULT_CONTROL_PORT
}

const fn default_timeout() -> u64 {
    5000
}

const fn default_max_body() -> usize {
    1_048_576
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,

    #[serde(default)]
    pub control: ControlConfig,

    #[serde(default)]
    pub forward: ForwardConfig,
}

/// Where the broker accepts client HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ListenConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_http_port(),
        }
    }
}

/// Where the broker accepts backend registration frames.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ControlConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_control_port")]
    pub port: u16,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_control_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ForwardConfig {
    /// Outbound call timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Max inbound request body size in bytes.
    #[serde(default = "default_max_body")]
    pub max_body: usize,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            max_body: default_max_body(),
        }
    }
}
