//! Application data directory utilities.
//!
//! Provides a centralized way to get the application's data directory.
//! Uses the platform data directory (`~/Library/Application Support` on macOS,
//! `$XDG_DATA_HOME` or `~/.local/share` on Linux) joined with [`APP_ID`], with a
//! fallback to `/tmp/{APP_ID}/` if the data directory is unavailable.

use std::path::PathBuf;

use crate::constants::{APP_ID, THUMBNAIL_SUBDIR};

/// Returns the root data directory for the application.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(format!("/tmp/{APP_ID}")),
        |data| data.join(APP_ID),
    )
}

/// Returns a data subdirectory for the given component.
///
/// # Arguments
///
/// * `subdir` - The subdirectory name within the app's data directory (e.g., `thumbnails`)
#[must_use]
pub fn get_data_subdir(subdir: &str) -> PathBuf { get_data_dir().join(subdir) }

/// Returns the default thumbnail cache root.
#[must_use]
pub fn default_thumbnail_root() -> PathBuf { get_data_subdir(THUMBNAIL_SUBDIR) }

/// Formats a byte count as a human-readable string.
///
/// # Returns
///
/// A human-readable string like "1.5 MB" or "256 KB"
#[must_use]
#[allow(clippy::cast_precision_loss)] // Precision loss is acceptable for human-readable output
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
