//! Thumbnail generation command.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::error::WallthumbError;
use crate::platform::path::absolutize;
use crate::thumbnail::ThumbnailService;

/// Widest path shown in the results table.
const MAX_PATH_CHARS: usize = 60;

/// Arguments for `wallthumb generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Wallpaper images to thumbnail.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Output as a JSON object mapping each source to its thumbnail.
    #[arg(long, short)]
    pub json: bool,
}

/// Executes `wallthumb generate`.
///
/// # Errors
///
/// Returns an error if the async runtime cannot start or the JSON output fails.
pub fn execute(args: &GenerateArgs, service: &ThumbnailService) -> Result<(), WallthumbError> {
    let sources = dedup_absolute(&args.paths);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let results = runtime.block_on(service.generate_thumbnails(&sources));

    if args.json {
        let map: BTreeMap<String, String> = results
            .iter()
            .map(|(source, thumb)| (source.display().to_string(), thumb.display().to_string()))
            .collect();
        output::print_json(&map)?;
        return Ok(());
    }

    #[derive(Tabled)]
    struct ResultRow {
        #[tabled(rename = "Source")]
        source: String,
        #[tabled(rename = "Thumbnail")]
        thumbnail: String,
        #[tabled(rename = "Cached")]
        cached: String,
    }

    let mut fallbacks = 0;
    let rows: Vec<ResultRow> = sources
        .iter()
        .filter_map(|source| results.get(source).map(|thumb| (source, thumb)))
        .map(|(source, thumb)| {
            let cached = thumb != source;
            if !cached {
                fallbacks += 1;
            }
            ResultRow {
                source: output::truncate_start(&source.display().to_string(), MAX_PATH_CHARS),
                thumbnail: output::truncate_start(&thumb.display().to_string(), MAX_PATH_CHARS),
                cached: output::format_bool(cached),
            }
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::last()).with(Alignment::center()))
        .to_string();

    println!("{}", format!("Thumbnails ({})", sources.len()).bold());
    println!("{table}");
    if fallbacks > 0 {
        println!("{}", format!("{fallbacks} source(s) could not be thumbnailed.").yellow());
    }
    Ok(())
}

/// Makes every path absolute and drops repeats, keeping the first occurrence.
fn dedup_absolute(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .map(|path| absolutize(path.as_path()))
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
