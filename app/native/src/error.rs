//! Error types for Wallthumb.
//!
//! `ThumbnailError` is the internal failure taxonomy of the thumbnail cache. It never crosses
//! the public generation boundary; callers of `generate_thumbnail` get the original path back.
//! `WallthumbError` is the error surfaced by the CLI and configuration layers.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Failures of a single thumbnail operation.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// The source image does not exist.
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// The source could not be decoded, or the thumbnail could not be encoded.
    #[error("Codec error for {}: {message}", path.display())]
    Codec { path: PathBuf, message: String },
    /// A filesystem operation failed.
    #[error("IO error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl ThumbnailError {
    /// Wraps an IO error with a short description of what was attempted.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Wraps an IO error raised while touching `path`.
    pub fn io_at(action: &str, path: &Path, source: io::Error) -> Self {
        Self::io(format!("{action} {}", path.display()), source)
    }

    /// Returns the taxonomy name of the error, used as a structured log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "source_not_found",
            Self::Codec { .. } => "codec",
            Self::Io { .. } => "io",
        }
    }
}

/// Errors that can occur during CLI execution.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum WallthumbError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Cache operation failed.
    #[error("Cache error: {0}")]
    CacheError(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<io::Error> for WallthumbError {
    fn from(err: io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for WallthumbError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<String> for WallthumbError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for WallthumbError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}
