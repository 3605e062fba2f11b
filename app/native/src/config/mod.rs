//! Configuration module for Wallthumb.
//!
//! Loads the JSONC configuration file and turns it into the explicit
//! [`ThumbnailConfig`](crate::thumbnail::ThumbnailConfig) value handed to the cache.
//! Nothing here is stored globally; callers load once and pass the result along.

pub mod types;

use std::path::{Path, PathBuf};

pub use types::{
    ConfigError, ThumbnailSettings, WallthumbConfig, config_paths,
    load_config as load_config_default, load_config_from_path,
};

use crate::thumbnail::ThumbnailConfig;

/// A configuration together with the file it was read from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The parsed configuration (defaults when no file was usable).
    pub config: WallthumbConfig,
    /// The file the configuration came from, if any.
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Resolves the thumbnail settings, using the config file's directory for relative paths.
    #[must_use]
    pub fn thumbnail_config(&self) -> ThumbnailConfig {
        let config_dir = self.path.as_deref().and_then(Path::parent);
        self.config.thumbnails.resolve(config_dir)
    }
}

/// Loads the configuration from `custom_path` or the default search paths.
///
/// Returns defaults if no file is found. A file that exists but cannot be read or parsed
/// is logged and replaced by defaults.
#[must_use]
pub fn load_or_default(custom_path: Option<&PathBuf>) -> LoadedConfig {
    let result = custom_path.map_or_else(load_config_default, load_config_from_path);

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            LoadedConfig { config, path: Some(path) }
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            LoadedConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            LoadedConfig::default()
        }
    }
}
