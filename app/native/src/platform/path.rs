//! Path utilities for configured locations.
//!
//! Configuration values such as `cacheDir` may use a leading `~` or be relative to the
//! directory containing the configuration file.

use std::path::{Path, PathBuf};

/// Expands a leading tilde to the user's home directory.
///
/// Absolute and relative paths are returned unchanged. Blank input yields an empty path.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Expands a tilde, then resolves relative results against `base_dir`.
///
/// ```ignore
/// let base = Path::new("/home/me/.config/wallthumb");
/// assert_eq!(expand_and_resolve("cache", base), base.join("cache"));
/// ```
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let expanded = expand(path);

    if expanded.as_os_str().is_empty() || expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}

/// Returns `path` as an absolute path without touching the filesystem.
///
/// Falls back to the input when the working directory cannot be read.
#[must_use]
pub fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
