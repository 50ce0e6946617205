//! Configuration management for dochat
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL (the service exposing /api/v1/ingest and /api/v1/chat)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum upload size per file in bytes; larger files are rejected locally
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Number of prior turns sent as context with each query
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Base directory for dochat data
    pub base_dir: PathBuf,

    /// Path to config file
    pub config_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            max_file_bytes: default_max_file_bytes(),
            history_window: default_history_window(),
            paths: PathsConfig::default(),
        }
    }
}

impl Config {
    /// Get the default base directory for dochat (~/.dochat)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dochat")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Initialize paths configuration
    fn init_paths(&mut self, base_dir: Option<PathBuf>) {
        let base = base_dir.unwrap_or_else(Self::default_base_dir);
        self.paths = PathsConfig {
            config_file: base.join("config.toml"),
            base_dir: base,
        };
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        let base = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.paths = PathsConfig {
            config_file: config_path.to_path_buf(),
            base_dir: base,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific base directory, falling back to
    /// defaults when no config file exists there
    pub fn load_from(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();
        config.init_paths(base_dir);

        if config.paths.config_file.exists() {
            debug!("Loading config from {:?}", config.paths.config_file);
            let content = std::fs::read_to_string(&config.paths.config_file)?;
            let mut loaded: Config = toml::from_str(&content)?;
            loaded.paths = config.paths;
            config = loaded;
        } else {
            debug!("No config file found, using defaults");
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("Invalid api_url '{}': {}", self.api_url, e)))?;

        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.max_file_bytes == 0 {
            return Err(Error::Config("max_file_bytes must be > 0".to_string()));
        }

        if self.history_window == 0 {
            return Err(Error::Config("history_window must be > 0".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_file_bytes, 10 * 1024 * 1024);
        assert_eq!(config.history_window, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.init_paths(Some(tmp.path().to_path_buf()));
        config.api_url = "http://10.0.0.5:9000".to_string();
        config.history_window = 4;

        config.save().unwrap();
        assert!(config.paths.config_file.exists());

        let loaded = Config::load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(loaded.api_url, "http://10.0.0.5:9000");
        assert_eq!(loaded.history_window, 4);
        // Unset fields come back as defaults
        assert_eq!(loaded.max_file_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.api_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api_url = "http://127.0.0.1:8000".to_string();
        assert!(config.validate().is_ok());

        config.history_window = 0;
        assert!(config.validate().is_err());

        config.history_window = 10;
        config.max_file_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_missing_dir_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from(Some(tmp.path().join("nope"))).unwrap();
        assert_eq!(config.history_window, 10);
    }
}
