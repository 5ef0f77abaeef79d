//! geodb CLI entry point
//!
//! Parses arguments, dispatches to the CLI module and exits non-zero on
//! failure. Configuration and boot live in `cli`.

use geodb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
