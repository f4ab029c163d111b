//! Application configuration.
//!
//! Read from a TOML file; every key is optional.
//!
//! ```toml
//! api_base_url = "https://fakestoreapi.com"
//! request_timeout_secs = 10
//! storage_dir = "/home/me/.local/share/shop"
//! devtools = true
//! persist_version = 0
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Bound on a single-product request.
    pub request_timeout_secs: u64,
    /// Directory for persisted stores. `None` keeps them in memory.
    pub storage_dir: Option<PathBuf>,
    /// Log every action through the tracing inspector.
    pub devtools: bool,
    pub persist_version: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://fakestoreapi.com".to_string(),
            request_timeout_secs: 10,
            storage_dir: None,
            devtools: true,
            persist_version: 0,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml_str(&content)?;
                info!(?path, "loaded configuration");
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(?path, "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str("devtools = false\nstorage_dir = \"state\"").unwrap();
        assert!(!config.devtools);
        assert_eq!(config.storage_dir, Some(PathBuf::from("state")));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.api_base_url, "https://fakestoreapi.com");
    }

    #[test]
    fn bad_types_are_rejected() {
        let err = AppConfig::from_toml_str("request_timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("larder.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("larder.toml");
        fs::write(&path, "api_base_url = \"http://localhost:8080\"\npersist_version = 2\n").unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.persist_version, 2);
    }
}
