//! Configuration loading
//!
//! Resolution order:
//! 1. Explicit path passed by the caller
//! 2. `FLEET_TRACK_CONFIG` environment variable
//! 3. Built-in defaults
//!
//! Every field in the TOML file is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::attachments::CompressionOptions;
use crate::domain::{DomainError, DomainResult};

pub const CONFIG_ENV_VAR: &str = "FLEET_TRACK_CONFIG";

/// Database path that keeps everything in memory
pub const IN_MEMORY_DB: &str = ":memory:";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Defaults to `{data_dir}/objects`
    pub root: Option<PathBuf>,
    /// Defaults to a `file://` URL of the root
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Defaults to `{data_dir}/logs`
    pub dir: Option<PathBuf>,
    pub app_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            app_name: "FleetTrack".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub data_dir: PathBuf,
    /// File name under `data_dir`, or `:memory:`
    pub database_file: String,
    pub storage: StorageConfig,
    pub compression: CompressionOptions,
    pub logging: LoggingConfig,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("fleet-data"),
            database_file: "fleet.db".to_string(),
            storage: StorageConfig::default(),
            compression: CompressionOptions::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FleetConfig {
    /// Load following the resolution order above
    pub fn load(explicit: Option<&Path>) -> DomainResult<Self> {
        let env_value = std::env::var(CONFIG_ENV_VAR).ok();
        match config_source(explicit, env_value) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> DomainResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| DomainError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> DomainResult<Self> {
        toml::from_str(content).map_err(|e| DomainError::Config(e.to_string()))
    }

    pub fn database_path(&self) -> PathBuf {
        if self.database_file == IN_MEMORY_DB {
            PathBuf::from(IN_MEMORY_DB)
        } else {
            self.data_dir.join(&self.database_file)
        }
    }

    pub fn storage_root(&self) -> PathBuf {
        self.storage
            .root
            .clone()
            .unwrap_or_else(|| self.data_dir.join("objects"))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.logging
            .dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }
}

/// Pick the config file, if any; an empty env value counts as unset
fn config_source(explicit: Option<&Path>, env_value: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    env_value
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FleetConfig::default();
        assert_eq!(config.database_path(), PathBuf::from("fleet-data/fleet.db"));
        assert_eq!(config.storage_root(), PathBuf::from("fleet-data/objects"));
        assert_eq!(config.log_dir(), PathBuf::from("fleet-data/logs"));
        assert_eq!(config.compression.max_dimension, 1920);
    }

    #[test]
    fn test_partial_toml() {
        let config = FleetConfig::from_toml_str(
            r#"
            data_dir = "/var/lib/fleet"

            [storage]
            public_base_url = "https://files.example.com"

            [compression]
            max_size_bytes = 500000
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path(), PathBuf::from("/var/lib/fleet/fleet.db"));
        assert_eq!(config.storage.public_base_url.as_deref(), Some("https://files.example.com"));
        assert_eq!(config.compression.max_size_bytes, 500_000);
        assert_eq!(config.compression.max_dimension, 1920);
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_in_memory_database() {
        let config = FleetConfig::from_toml_str(r#"database_file = ":memory:""#).unwrap();
        assert_eq!(config.database_path(), PathBuf::from(":memory:"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = FleetConfig::from_toml_str("data_dir = [").unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.toml");
        std::fs::write(&path, "[logging]\napp_name = \"Depot\"\n").unwrap();

        let config = FleetConfig::load(Some(&path)).unwrap();
        assert_eq!(config.logging.app_name, "Depot");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let err = FleetConfig::from_file(Path::new("/nonexistent/fleet.toml")).unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_source_priority() {
        let explicit = PathBuf::from("a.toml");
        assert_eq!(
            config_source(Some(&explicit), Some("b.toml".to_string())),
            Some(explicit.clone())
        );
        assert_eq!(config_source(None, Some("b.toml".to_string())), Some(PathBuf::from("b.toml")));
        assert_eq!(config_source(None, Some("  ".to_string())), None);
        assert_eq!(config_source(None, None), None);
    }
}
