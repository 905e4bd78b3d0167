/// Application configuration
///
/// Settings are read from `config.json` in the user's config directory:
/// - Linux: ~/.config/mirage-client/config.json
/// - macOS: ~/Library/Application Support/mirage-client/config.json
/// - Windows: %APPDATA%\mirage-client\config.json
///
/// Missing keys fall back to defaults. `MIRAGE_SERVICE_URL` overrides the
/// service origin.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "mirage-client";
const CONFIG_FILE: &str = "config.json";
const SERVICE_URL_ENV: &str = "MIRAGE_SERVICE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Origin of the edit service, without trailing path
    pub service_url: String,
    /// Key the last result reference is stored under
    pub persist_key: String,
    /// Lifetime of the stored reference in days
    pub persist_days: i64,
    /// Largest file accepted for upload
    pub max_upload_bytes: u64,
    /// Request timeout; `None` waits for the service indefinitely
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8017".to_string(),
            persist_key: "lastGeneratedImage".to_string(),
            persist_days: 7,
            max_upload_bytes: 10 * 1024 * 1024,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults on any error
    pub fn load() -> Self {
        let mut config = match config_dir() {
            Some(dir) => match Self::from_file(&dir.join(CONFIG_FILE)) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("⚠️  {}, using defaults", e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        if let Ok(url) = std::env::var(SERVICE_URL_ENV) {
            config.apply_service_url(&url);
        }

        config
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_service_url(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.service_url = url.to_string();
        }
    }

    /// Full URL of the edit endpoint
    pub fn edit_endpoint(&self) -> String {
        format!("{}/edit-image/", self.service_url.trim_end_matches('/'))
    }

    /// Full URL of the service root (health check)
    pub fn root_endpoint(&self) -> String {
        format!("{}/", self.service_url.trim_end_matches('/'))
    }
}

fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Directory for persistent application data (the key/value store)
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir);
    path.push(APP_DIR);
    path
}

/// Directory for cached result images
pub fn results_dir() -> PathBuf {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir);
    path.push(APP_DIR);
    path.push("results");
    path
}
