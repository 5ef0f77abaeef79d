//! CLI command implementations

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::{Config, StorageKind};
use crate::gateway::FileGateway;
use crate::http_server::HttpServer;
use crate::logging;
use crate::service::Catalog;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Start {
            config,
            port,
            verbose,
        } => start(&config, port, verbose),
        Command::Check { config } => check(&config),
    }
}

/// Writes a default config and creates `<data_dir>/<database>/`, with
/// `data_dir` taken relative to the config file's directory.
///
/// Refuses to overwrite an existing config file.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::AlreadyInitialized(config_path.to_path_buf()));
    }

    let mut config = Config::default();
    let config_dir = config_path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = config_dir {
        fs::create_dir_all(dir)?;
    }
    fs::write(config_path, serde_json::to_string_pretty(&config)?)?;

    if let Some(dir) = config_dir {
        config.resolve_data_dir(dir);
    }

    let root = FileGateway::create_database(config.data_path(), &config.database)
        .map_err(|e| CliError::boot_failed(e.to_string()))?;

    println!("Wrote {}", config_path.display());
    println!("Created database directory {}", root.display());
    Ok(())
}

/// Boots the services and serves HTTP until the process is stopped.
pub fn start(config_path: &Path, port: Option<u16>, verbose: bool) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    logging::init(&config.log_filter, verbose);

    if config.storage == StorageKind::File {
        let root = config.data_path().join(&config.database);
        if !root.is_dir() {
            return Err(CliError::boot_failed(format!(
                "database directory {} does not exist. Run 'geodb init' first.",
                root.display()
            )));
        }
    }

    let catalog = Arc::new(Catalog::new(config.open_gateway()));
    if config.seed_samples {
        catalog.seed_samples()?;
    }

    info!(
        storage = ?config.storage,
        database = %config.database,
        addr = %config.http.socket_addr(),
        "starting geodb"
    );
    let server = HttpServer::with_config(config.http.clone(), catalog);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validates the config and prints it with every default filled in.
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
