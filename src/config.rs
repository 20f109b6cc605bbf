//! # Configuration
//!
//! JSON config file with serde-provided defaults, overridden by the
//! `PORT` and `TOURBASE_DATA_DIR` environment variables. A missing
//! file yields the defaults, so the binary runs without any setup.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::HttpConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the collection files (default "./data")
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Host to bind to (default "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (default empty = permissive)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration: file if present, defaults otherwise, then
    /// environment overrides, then validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env(&mut self) {
        if let Ok(port) = env::var("PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.port = port;
            }
        }
        if let Ok(data_dir) = env::var("TOURBASE_DATA_DIR") {
            if !data_dir.is_empty() {
                self.data_dir = data_dir;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be > 0".into()));
        }
        Ok(())
    }

    /// Get the data directory as a Path.
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// The HTTP-facing subset of this config.
    pub fn http(&self) -> HttpConfig {
        HttpConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();

        assert_eq!(config.data_dir, "./data");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_file_values_are_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tourbase.json");
        fs::write(
            &path,
            json!({"data_dir": "/var/lib/tourbase", "port": 8080}).to_string(),
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, "/var/lib/tourbase");
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_empty_data_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tourbase.json");
        fs::write(&path, json!({"data_dir": ""}).to_string()).unwrap();

        assert!(Config::load(&path).is_err());
    }
}
