//! Configuration for the comparison client.
//!
//! Stored in a machine-readable TOML file located at:
//!   %APPDATA%/LexBase/config/config.toml on Windows
//!   $XDG_DATA_HOME/LexBase/config/config.toml on Linux
//!   ~/Library/Application Support/LexBase/config/config.toml on macOS
//!
//! The config tracks where the comparison backend lives and the cadence of
//! result polling. Everything has a working default so a missing file is
//! never an error.

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Backend endpoint and request options.
    #[serde(default)]
    pub api: ApiSettings,
    /// Result-polling cadence.
    #[serde(default)]
    pub polling: PollingSettings,
    /// Export tuning (table capture resolution).
    #[serde(default)]
    pub export: ExportSettings,
}

/// Where the comparison backend lives and how long to wait on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. Enrichment calls can run long on the
    /// server side, so this is generous.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    120
}

/// Cadence of the background result poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSettings {
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
}

impl PollingSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
        }
    }
}

const fn default_poll_interval_secs() -> u64 {
    5
}

/// Export-related preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Upscaling factor applied when the table is captured for the
    /// rasterized export.
    #[serde(default = "default_capture_scale")]
    pub capture_scale: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            capture_scale: default_capture_scale(),
        }
    }
}

const fn default_capture_scale() -> u32 {
    2
}

/// Standard relative path to the config file (resolved per OS at runtime).
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the root directory where LexBase stores data.
///
/// Order of precedence:
/// 1. `LEXBASE_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var("LEXBASE_HOME") {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("LexBase"))
}

/// Returns the config directory under the workspace root.
pub fn config_dir() -> Result<PathBuf> {
    let root = workspace_root()?;
    Ok(root.join("config"))
}

/// Path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_file_path()?;
    if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

/// Persists the configuration to disk.
pub fn save(config: &AppConfig) -> Result<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)?;
    let path = config_file_path()?;
    let data = toml::to_string_pretty(config)?;
    fs::write(&path, data)?;
    Ok(())
}
