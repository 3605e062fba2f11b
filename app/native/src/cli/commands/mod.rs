//! CLI command definitions using Clap.
//!
//! Commands are split into domain-specific submodules:
//!
//! - `cache` - Cache maintenance commands
//! - `generate` - Thumbnail generation

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config::{self, LoadedConfig};
use crate::error::WallthumbError;
use crate::schema;
use crate::thumbnail::ThumbnailService;

pub mod cache;
pub mod generate;

pub use cache::CacheCommands;
pub use generate::GenerateArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wallthumb CLI - Wallpaper thumbnail cache.
#[derive(Parser, Debug)]
#[command(name = "wallthumb")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Generate thumbnails for one or more wallpapers.
    ///
    /// Prints the thumbnail path for each source. Sources that cannot be
    /// thumbnailed map to themselves.
    #[command(after_long_help = r#"Examples:
  wallthumb generate ~/Pictures/walls/*.jpg          # Table of results
  wallthumb generate ~/Pictures/walls/a.png --json   # JSON object of source -> thumbnail"#)]
    Generate(GenerateArgs),

    /// Thumbnail cache maintenance commands.
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Output Wallthumb configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    /// Can be used with eval or redirected to a file.
    ///
    /// Usage:
    ///   eval "$(wallthumb completions --shell zsh)"
    ///   wallthumb completions --shell bash > ~/.local/share/bash-completion/completions/wallthumb
    ///   wallthumb completions --shell fish > ~/.config/fish/completions/wallthumb.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), WallthumbError> {
        match &self.command {
            Commands::Generate(args) => generate::execute(args, &self.service()?),
            Commands::Cache(cmd) => cache::execute(cmd, &self.service()?),

            Commands::Schema => {
                println!("{}", schema::print_schema());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Loads the configuration and builds the thumbnail service from it.
    fn service(&self) -> Result<ThumbnailService, WallthumbError> {
        let loaded = self.load_config()?;
        Ok(ThumbnailService::new(loaded.thumbnail_config()))
    }

    fn load_config(&self) -> Result<LoadedConfig, WallthumbError> {
        let custom = self.config_path();
        if let Some(path) = &custom
            && !path.exists()
        {
            return Err(WallthumbError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        Ok(config::load_or_default(custom.as_ref()))
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "wallthumb", &mut io::stdout());
    }
}
