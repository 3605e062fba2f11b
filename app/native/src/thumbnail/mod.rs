//! Wallpaper thumbnail cache.
//!
//! Thumbnails are content-addressed by the source's path and modification time and stored
//! as JPEG files under a single cache root:
//!
//! - [`key`] - Cache key derivation from a source file's identity
//! - [`store`] - Atomic on-disk storage keyed by cache key
//! - [`generator`] - Decode, cover-fit and encode
//! - [`inflight`] - Per-key de-duplication of concurrent generations
//! - [`scheduler`] - Windowed batch fan-out
//! - [`evict`] - TTL sweep and full clear
//! - [`stats`] - Aggregate count and size
//! - [`service`] - The public facade tying the pieces together

pub mod evict;
pub mod generator;
pub mod inflight;
pub mod key;
pub mod scheduler;
pub mod service;
pub mod stats;
pub mod store;

use std::path::PathBuf;
use std::time::Duration;

pub use generator::{BoxSize, Generator, JpegGenerator};
pub use key::CacheKey;
pub use service::ThumbnailService;
pub use stats::CacheStats;
pub use store::ThumbnailStore;

use crate::cache::default_thumbnail_root;
use crate::constants::thumbnail;

/// Runtime configuration of the thumbnail cache.
///
/// Built once (usually from the config file) and handed to [`ThumbnailService::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailConfig {
    /// Directory holding the cached artifacts.
    pub cache_root: PathBuf,
    /// Target box width in pixels.
    pub width: u32,
    /// Target box height in pixels.
    pub height: u32,
    /// JPEG quality (1-100).
    pub quality: u8,
    /// Entries not accessed for this long are removed by the TTL sweep.
    pub ttl: Duration,
}

impl ThumbnailConfig {
    /// Default settings rooted at `cache_root`.
    #[must_use]
    pub fn with_root(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            width: thumbnail::WIDTH,
            height: thumbnail::HEIGHT,
            quality: thumbnail::QUALITY,
            ttl: thumbnail::TTL,
        }
    }

    /// The target box.
    #[must_use]
    pub const fn box_size(&self) -> BoxSize { BoxSize { width: self.width, height: self.height } }
}

impl Default for ThumbnailConfig {
    fn default() -> Self { Self::with_root(default_thumbnail_root()) }
}
