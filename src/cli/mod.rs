//! CLI module for geodb
//!
//! - init: write a default config and create the database directory
//! - start: boot the services and serve HTTP
//! - check: validate and print the effective config

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, init, run, run_command, start};
pub use errors::{CliError, CliResult};
