//! Process configuration
//!
//! Loaded from a JSON file. Every field has a default, so `{}` is a valid
//! configuration. A relative `data_dir` is taken relative to the directory
//! holding the config file, not the working directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::{
    DocumentGateway, FileGateway, LazyGateway, MemoryGateway, RetryingGateway,
    DEFAULT_MAX_ATTEMPTS,
};
use crate::http_server::HttpServerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Document storage backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// One JSON file per collection under `data_dir/database`
    #[default]
    File,
    /// Process-local, lost on exit
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for file storage
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Logical database name
    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default)]
    pub storage: StorageKind,

    /// Attempts per gateway operation for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Insert one sample record into each empty collection at startup
    #[serde(default)]
    pub seed_samples: bool,

    /// tracing filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_data_dir() -> String {
    "./geodb-data".to_string()
}

fn default_database() -> String {
    "seDB".to_string()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database: default_database(),
            storage: StorageKind::default(),
            max_retries: default_max_retries(),
            seed_samples: false,
            log_filter: default_log_filter(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Loads and validates configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_data_dir(base);
        }
        Ok(config)
    }

    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_retries == 0 {
            return Err(ConfigError::Invalid("max_retries must be >= 1".into()));
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::Invalid("database must not be empty".into()));
        }
        if self.database.contains(['/', '\\']) || self.database == ".." {
            return Err(ConfigError::Invalid(format!(
                "database '{}' must be a plain directory name",
                self.database
            )));
        }
        if self.storage == StorageKind::File && self.data_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }
        Ok(())
    }

    /// Anchors a relative `data_dir` at `base`. Absolute paths are kept.
    pub fn resolve_data_dir(&mut self, base: &Path) {
        let data_dir = Path::new(&self.data_dir);
        if data_dir.is_relative() && !base.as_os_str().is_empty() {
            self.data_dir = base.join(data_dir).to_string_lossy().into_owned();
        }
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Builds the gateway stack: retries around a lazily opened backend.
    pub fn open_gateway(&self) -> Arc<dyn DocumentGateway> {
        match self.storage {
            StorageKind::File => {
                let data_dir = self.data_path().to_path_buf();
                let database = self.database.clone();
                let lazy = LazyGateway::new(move || FileGateway::open(&data_dir, &database));
                Arc::new(RetryingGateway::with_attempts(lazy, self.max_retries))
            }
            StorageKind::Memory => {
                let lazy = LazyGateway::new(|| Ok(MemoryGateway::new()));
                Arc::new(RetryingGateway::with_attempts(lazy, self.max_retries))
            }
        }
    }
}
