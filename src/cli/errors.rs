//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("GEO_CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    #[error("GEO_CLI_ALREADY_INITIALIZED: config already exists at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("GEO_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("GEO_CLI_BOOT_FAILED: {0}")]
    BootFailed(String),
}

impl CliError {
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::BootFailed(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "GEO_CLI_CONFIG_ERROR",
            Self::AlreadyInitialized(_) => "GEO_CLI_ALREADY_INITIALIZED",
            Self::Io(_) => "GEO_CLI_IO_ERROR",
            Self::BootFailed(_) => "GEO_CLI_BOOT_FAILED",
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        Self::BootFailed(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(ConfigError::Parse(e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
