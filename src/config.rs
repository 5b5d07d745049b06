//! CLI configuration
//!
//! Stored as JSON in `~/.config/pulse/config.json`, or wherever
//! `PULSE_CONFIG` points. A missing file means defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "PULSE_CONFIG";

/// Default snapshot file name
pub const DEFAULT_SNAPSHOT: &str = "registry.pulse";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snapshot file holding the registry
    pub snapshot: PathBuf,
    /// Pincode list enumerated by universe-wide merchant removal
    pub universe: Option<PathBuf>,
    /// tracing filter directive, e.g. "pulse_registry=debug"
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            snapshot: PathBuf::from(DEFAULT_SNAPSHOT),
            universe: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load from `PULSE_CONFIG` or the default config path
    pub fn load() -> Result<Self> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// The config file [`Config::load`] reads: `PULSE_CONFIG` if set,
    /// otherwise the default path
    pub fn locate() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(Self::default_path)
    }

    /// Load from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Save to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;
        Ok(())
    }

    /// `~/.config/pulse/config.json` (platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pulse").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.snapshot, PathBuf::from(DEFAULT_SNAPSHOT));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            snapshot: PathBuf::from("/srv/pulse/registry.pulse"),
            universe: Some(PathBuf::from("/srv/pulse/pincodes.csv")),
            log_filter: "pulse_registry=debug".into(),
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"universe": "all.csv"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.universe, Some(PathBuf::from("all.csv")));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
