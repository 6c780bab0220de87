//! Configuration loading and validation.
//!
//! Configuration is layered: built-in defaults, then an optional config
//! file (explicit or auto-detected), then CLI flags applied by
//! `cmd::run`. [`LoadedConfig`] records where the effective config came
//! from and its [`ConfigVersion`] for the health endpoint.

pub mod model;
pub mod sources;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::HermesError;
use model::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigVersion {
    Hash(String),
    Defaults,
}

impl ConfigVersion {
    /// Short form for display: the first 8 hex digits, or `defaults`.
    #[must_use]
    pub fn short(&self) -> String {
        match self {
            Self::Hash(h) => h.get(..8).unwrap_or(h).to_string(),
            Self::Defaults => "defaults".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub version: ConfigVersion,
    pub source_name: String,
}

impl LoadedConfig {
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            config: Config::default(),
            version: ConfigVersion::Defaults,
            source_name: "defaults".to_string(),
        }
    }
}

/// Load the explicit config file, or the first auto-detected one, or
/// fall back to built-in defaults.
pub async fn load(explicit: Option<&Path>) -> Result<LoadedConfig, HermesError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => auto_detect().await,
    };

    let Some(path) = path else {
        return Ok(LoadedConfig::defaults());
    };

    let source = sources::for_path(&path)?;
    let (config, version) = source.load().await?;
    tracing::info!(path = %source.path().display(), format = source.name(), "config loaded");

    Ok(LoadedConfig {
        config,
        version,
        source_name: path.display().to_string(),
    })
}

async fn auto_detect() -> Option<PathBuf> {
    for name in sources::AUTO_DETECT_CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return Some(path);
        }
    }
    None
}
