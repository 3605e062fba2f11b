//! CLI module for Wallthumb.
//!
//! Every command loads the configuration, builds a [`ThumbnailService`](crate::thumbnail::ThumbnailService)
//! from it and runs to completion.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::WallthumbError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), WallthumbError> {
    let cli = Cli::parse();
    cli.execute()
}
