//! CLI module for ratewatch.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Screen followers and one-shot commands
//!
//! # Usage
//!
//! Commands that need no services are handled before configuration is read:
//!
//! ```ignore
//! use ratewatch::cli::{parse_args, run_cli_command, CliCommand};
//!
//! let command = parse_args(std::env::args());
//! if let Some(result) = run_cli_command(&command) {
//!     return result;
//! }
//! // Build services, then `run_command(command, services)`.
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use commands::run_command;
pub use version::{version_line, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

/// Run a command that needs no services.
///
/// # Returns
///
/// * `None` - the command needs configuration and services
/// * `Some(Ok(()))` - version or help was printed
/// * `Some(Err(e))` - the arguments were invalid (usage already printed)
pub fn run_cli_command(command: &CliCommand) -> Option<Result<()>> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Some(Ok(()))
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Some(Ok(()))
        }
        CliCommand::Invalid { message } => {
            eprintln!("{}", USAGE);
            Some(Err(eyre!("{}", message)))
        }
        _ => None,
    }
}
