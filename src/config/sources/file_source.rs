//! Generic async file-based config source with SHA256 versioning.
//!
//! [`FileSource`] reads any supported format by accepting a
//! deserialization function at construction time. It reads the file
//! asynchronously via Tokio, validates the result, and computes a SHA256
//! hash so `/health` can report which revision is running.

use std::path::{Path, PathBuf};

use super::sha256_hex;
use crate::config::model::Config;
use crate::config::validation::validate;
use crate::config::ConfigVersion;
use crate::error::HermesError;

type Deserializer = fn(&str) -> Result<Config, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: Deserializer,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: Deserializer) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_content(&self) -> Result<String, HermesError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HermesError::ConfigFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                HermesError::Io(e)
            }
        })
    }

    pub async fn load(&self) -> Result<(Config, ConfigVersion), HermesError> {
        let content = self.read_content().await?;

        let config = (self.deserialize)(&content).map_err(|e| HermesError::ConfigParse {
            path: self.path.display().to_string(),
            source: e,
        })?;

        if let Err(errors) = validate(&config) {
            return Err(HermesError::ConfigValidation { errors });
        }

        let hash = sha256_hex(content.as_bytes());
        Ok((config, ConfigVersion::Hash(hash)))
    }
}
