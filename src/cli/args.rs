//! CLI argument definitions using clap
//!
//! Commands:
//! - geodb init --config <path>
//! - geodb start --config <path> [--port N] [--verbose]
//! - geodb check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// geodb - REST service for countries, states, counties and cities
#[derive(Parser, Debug)]
#[command(name = "geodb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config and create the database directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./geodb.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./geodb.json")]
        config: PathBuf,

        /// Override the configured HTTP port
        #[arg(long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate the config and print it with defaults filled in
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./geodb.json")]
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_flags() {
        let cli = Cli::try_parse_from(["geodb", "start", "--port", "9001", "-v"]).unwrap();
        match cli.command {
            Command::Start {
                config,
                port,
                verbose,
            } => {
                assert_eq!(config, PathBuf::from("./geodb.json"));
                assert_eq!(port, Some(9001));
                assert!(verbose);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_takes_config_path() {
        let cli = Cli::try_parse_from(["geodb", "check", "--config", "/etc/geodb.json"]).unwrap();
        assert!(matches!(cli.command, Command::Check { .. }));
    }
}
