//! Configuration module for Painlog.
//!
//! Typed configuration structs that map to the YAML configuration file,
//! with loading, defaults, and a small builder surface for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration for Painlog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub remote: RemoteConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            remote: RemoteConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Local database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_data_dir().join("painlog.db"),
        }
    }
}

/// Remote backup location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Name of the backup folder in the user's drive.
    pub folder_name: String,
    /// Name of the backup document inside the folder.
    pub file_name: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            folder_name: "Painlog".to_string(),
            file_name: "painlog-backup.json".to_string(),
        }
    }
}

/// Authentication / OAuth settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// OAuth client id. `None` until the user configures remote sync.
    pub client_id: Option<String>,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Default config file location (`$XDG_CONFIG_HOME/painlog/config.yaml`).
    pub fn default_path() -> PathBuf {
        base_dir("XDG_CONFIG_HOME", ".config")
            .join("painlog")
            .join("config.yaml")
    }
}

/// Default data directory (`$XDG_DATA_HOME/painlog`).
pub fn default_data_dir() -> PathBuf {
    base_dir("XDG_DATA_HOME", ".local/share").join("painlog")
}

fn base_dir(env_var: &str, home_suffix: &str) -> PathBuf {
    if let Ok(dir) = std::env::var(env_var) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(home_suffix),
        Err(_) => PathBuf::from("/tmp"),
    }
}
