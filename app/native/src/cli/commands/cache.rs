//! Cache CLI commands.

use clap::Subcommand;
use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cache::format_bytes;
use crate::cli::output;
use crate::error::WallthumbError;
use crate::thumbnail::ThumbnailService;

/// Cache subcommands for maintaining the thumbnail cache.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum CacheCommands {
    /// Remove thumbnails that have not been used recently.
    ///
    /// Deletes every thumbnail whose last access is older than the configured
    /// TTL (30 days by default).
    #[command(after_long_help = r#"Examples:
  wallthumb cache prune   # Remove stale thumbnails"#)]
    Prune,

    /// Remove every thumbnail.
    #[command(after_long_help = r#"Examples:
  wallthumb cache clear   # Empty the thumbnail cache"#)]
    Clear,

    /// Show the number and total size of cached thumbnails.
    Stats {
        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Show the thumbnail cache directory.
    #[command(after_long_help = r#"Examples:
  wallthumb cache path    # Print the cache directory path"#)]
    Path,
}

/// Execute cache subcommands.
///
/// # Errors
///
/// Returns an error if the cache directory cannot be read.
pub fn execute(cmd: &CacheCommands, service: &ThumbnailService) -> Result<(), WallthumbError> {
    match cmd {
        CacheCommands::Prune => {
            let removed = service.clear_old_thumbnails().map_err(cache_error)?;
            println!("Removed {removed} expired {}.", plural(removed));
        }
        CacheCommands::Clear => {
            let removed = service.clear_all_thumbnails().map_err(cache_error)?;
            println!("Removed {removed} cached {}.", plural(removed));
        }
        CacheCommands::Stats { json } => print_stats(service, *json)?,
        CacheCommands::Path => println!("{}", service.store().root().display()),
    }
    Ok(())
}

fn print_stats(service: &ThumbnailService, json: bool) -> Result<(), WallthumbError> {
    #[derive(Tabled)]
    struct StatsRow {
        #[tabled(rename = "Thumbnails")]
        count: usize,
        #[tabled(rename = "Size")]
        size: String,
        #[tabled(rename = "Location")]
        root: String,
    }

    let stats = service.get_cache_stats();
    if json {
        output::print_json(&stats)?;
        return Ok(());
    }

    let row = StatsRow {
        count: stats.count,
        size: format_bytes(stats.total_size_bytes),
        root: service.store().root().display().to_string(),
    };
    let table = Table::new([row])
        .with(Style::rounded())
        .with(Modify::new(Columns::new(0..2)).with(Alignment::right()))
        .to_string();

    println!("{}", "Thumbnail cache".bold());
    println!("{table}");
    Ok(())
}

const fn plural(n: usize) -> &'static str { if n == 1 { "thumbnail" } else { "thumbnails" } }

#[allow(clippy::needless_pass_by_value)]
fn cache_error(err: crate::error::ThumbnailError) -> WallthumbError {
    WallthumbError::CacheError(err.to_string())
}
