//! Configuration types for Wallthumb.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cache::default_thumbnail_root;
use crate::constants::{APP_NAME, thumbnail};
use crate::platform::path::expand_and_resolve;
use crate::thumbnail::ThumbnailConfig;

/// Thumbnail cache settings as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ThumbnailSettings {
    /// Directory holding cached thumbnails.
    ///
    /// Empty uses `<data dir>/com.marcosmoura.wallthumb/thumbnails`.
    /// Supports `~` and paths relative to the configuration file.
    pub cache_dir: String,

    /// Width of the thumbnail box in pixels.
    pub width: u32,

    /// Height of the thumbnail box in pixels.
    pub height: u32,

    /// JPEG quality between 1 and 100.
    pub quality: u8,

    /// Days since the last access after which a thumbnail is removed by `cache prune`.
    pub ttl_days: u64,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            cache_dir: String::new(),
            width: thumbnail::WIDTH,
            height: thumbnail::HEIGHT,
            quality: thumbnail::QUALITY,
            ttl_days: thumbnail::TTL_DAYS,
        }
    }
}

impl ThumbnailSettings {
    /// Resolves the settings into the runtime configuration value.
    ///
    /// `config_dir` is the directory of the configuration file, used for relative `cacheDir`
    /// values. Out-of-range numbers are clamped instead of rejected.
    #[must_use]
    pub fn resolve(&self, config_dir: Option<&Path>) -> ThumbnailConfig {
        let base = config_dir.map_or_else(PathBuf::new, Path::to_path_buf);
        let cache_root = if self.cache_dir.trim().is_empty() {
            default_thumbnail_root()
        } else {
            expand_and_resolve(&self.cache_dir, &base)
        };

        ThumbnailConfig {
            cache_root,
            width: self.width.max(1),
            height: self.height.max(1),
            quality: self.quality.clamp(1, 100),
            ttl: Duration::from_secs(self.ttl_days.saturating_mul(24 * 60 * 60)),
        }
    }
}

/// Root configuration for Wallthumb.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct WallthumbConfig {
    /// JSON Schema reference for editor support.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Thumbnail cache settings.
    pub thumbnails: ThumbnailSettings,
}

/// Errors that can occur when loading the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    NotFound,
    /// The configuration file exists but could not be read.
    IoError(std::io::Error),
    /// The configuration file contains invalid JSON.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "No configuration file found. Expected at ~/.config/wallthumb/config.jsonc \
                or ~/.wallthumb.jsonc"
            ),
            Self::IoError(err) => write!(f, "Failed to read configuration file: {err}"),
            Self::ParseError(err) => write!(f, "Failed to parse configuration file: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
            Self::NotFound => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err) }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self { Self::ParseError(err) }
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Configuration file names in the home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".wallthumb.jsonc", ".wallthumb.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/wallthumb/config.jsonc` or `config.json` (when set)
/// 2. `~/.config/wallthumb/config.jsonc` or `config.json`
/// 3. The platform config directory (`~/Library/Application Support/wallthumb/` on macOS)
/// 4. `~/.wallthumb.jsonc` or `~/.wallthumb.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut push_dir = |dir: PathBuf| {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    };

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        push_dir(PathBuf::from(xdg_config).join(APP_NAME));
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(home.join(".config").join(APP_NAME));
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(config_dir.join(APP_NAME));
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, `ConfigError::IoError` if it
/// cannot be read and `ConfigError::ParseError` if it is not valid JSONC.
pub fn load_config_from_path(path: &PathBuf) -> Result<(WallthumbConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: WallthumbConfig = serde_json::from_reader(reader)?;
    Ok((config, path.clone()))
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected
/// locations, or the errors of [`load_config_from_path`] for the first file found.
pub fn load_config() -> Result<(WallthumbConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}
