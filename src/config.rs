//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::storage::{FileStore, GRID_ENTRIES_KEY};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Slot the CLI operates on
    #[serde(default = "default_key")]
    pub key: String,

    /// Largest value a single slot may hold, 0 for unlimited
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: usize,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("gridkeep").to_string_lossy().to_string())
        .unwrap_or_else(|| "./gridkeep_data".to_string())
}

fn default_key() -> String {
    GRID_ENTRIES_KEY.to_string()
}

fn default_quota_bytes() -> usize {
    5 * 1024 * 1024 // browsers allow roughly 5 MB per origin
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: default_key(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~/` expanded
    pub fn data_path(&self) -> PathBuf {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.data_dir)),
            None => PathBuf::from(&self.data_dir),
        }
    }

    /// Build the file store this configuration describes
    pub fn file_store(&self) -> FileStore {
        let store = FileStore::new(self.data_path());
        if self.quota_bytes > 0 {
            store.with_quota(self.quota_bytes)
        } else {
            store
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Nothing is logged here; call [`LoadReport::log`] once a subscriber is
    /// installed.
    pub fn load_default() -> (Self, LoadReport) {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("gridkeep").join("config.toml")),
            Some(PathBuf::from("/etc/gridkeep/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        Self::load_first(config_paths.into_iter().flatten())
    }

    /// Load the first candidate that exists and parses, collecting failures
    pub fn load_first(paths: impl IntoIterator<Item = PathBuf>) -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::load_with_env(&path) {
                Ok(config) => {
                    report.source = Some(path);
                    return (config, report);
                }
                Err(e) => report.failures.push(e),
            }
        }

        (Self::from_env(), report)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Storage overrides
        if let Some(data_dir) = var("GRIDKEEP_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(key) = var("GRIDKEEP_KEY") {
            self.storage.key = key;
        }
        if let Some(quota) = var("GRIDKEEP_QUOTA_BYTES") {
            if let Ok(q) = quota.parse() {
                self.storage.quota_bytes = q;
            }
        }

        // Logging overrides
        if let Some(level) = var("GRIDKEEP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("GRIDKEEP_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Where the configuration came from and which files were skipped
#[derive(Debug, Default)]
pub struct LoadReport {
    /// File the configuration was read from, `None` for defaults
    pub source: Option<PathBuf>,
    /// Candidate files that exist but could not be loaded
    pub failures: Vec<ConfigError>,
}

impl LoadReport {
    /// Report for a configuration read from an explicit file
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(path.into()),
            failures: Vec::new(),
        }
    }

    pub fn log(&self) {
        for e in &self.failures {
            tracing::warn!("Skipped config file: {}", e);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Gridkeep Configuration
#
# Environment variables override these settings:
# - GRIDKEEP_DATA_DIR
# - GRIDKEEP_KEY
# - GRIDKEEP_QUOTA_BYTES
# - GRIDKEEP_LOG_LEVEL
# - GRIDKEEP_LOG_FORMAT

[storage]
# Directory holding one <key>.json file per list
data_dir = "~/.local/share/gridkeep"

# Slot the CLI reads and writes
key = "gridEntries"

# Largest value a slot may hold in bytes (0 = unlimited)
quota_bytes = 5242880

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
