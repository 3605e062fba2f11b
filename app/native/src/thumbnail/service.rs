//! Public thumbnail cache facade.
//!
//! `generate_thumbnail` never fails: any error is logged and the caller receives the
//! original source path, so the UI can always show something.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use super::inflight::InFlight;
use super::key::CacheKey;
use super::stats::{self, CacheStats};
use super::store::ThumbnailStore;
use super::{Generator, JpegGenerator, ThumbnailConfig, evict, scheduler};
use crate::constants::thumbnail::BATCH_WINDOW;
use crate::error::ThumbnailError;

/// Generates, caches and evicts wallpaper thumbnails.
pub struct ThumbnailService {
    config: ThumbnailConfig,
    store: ThumbnailStore,
    generator: Arc<dyn Generator>,
    inflight: InFlight,
    /// Set once the unusable cache root has been reported.
    root_warned: AtomicBool,
}

impl std::fmt::Debug for ThumbnailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailService")
            .field("config", &self.config)
            .field("in_flight", &self.inflight.len())
            .finish_non_exhaustive()
    }
}

impl ThumbnailService {
    /// Creates a service using the JPEG generator configured by `config`.
    #[must_use]
    pub fn new(config: ThumbnailConfig) -> Self {
        let generator = JpegGenerator::new(config.box_size(), config.quality);
        Self::with_generator(config, Arc::new(generator))
    }

    /// Creates a service with a custom generator.
    #[must_use]
    pub fn with_generator(config: ThumbnailConfig, generator: Arc<dyn Generator>) -> Self {
        Self {
            store: ThumbnailStore::new(&config.cache_root),
            config,
            generator,
            inflight: InFlight::new(),
            root_warned: AtomicBool::new(false),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ThumbnailConfig { &self.config }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &ThumbnailStore { &self.store }

    /// Returns the thumbnail path for `source`, generating it on a cache miss.
    ///
    /// Falls back to `source` itself if the file is missing, cannot be decoded, or the
    /// thumbnail cannot be written.
    ///
    /// Must be polled inside a Tokio runtime: decoding runs on its blocking pool.
    pub async fn generate_thumbnail(&self, source: &Path) -> PathBuf {
        match self.try_generate(source).await {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(
                    path = %source.display(),
                    kind = err.kind(),
                    error = %err,
                    "thumbnail unavailable, serving original"
                );
                source.to_path_buf()
            }
        }
    }

    /// Generates thumbnails for `sources`, at most three at a time.
    ///
    /// Returns a map from each source to its thumbnail (or to itself on failure).
    /// Like [`Self::generate_thumbnail`], this must run inside a Tokio runtime.
    pub async fn generate_thumbnails(&self, sources: &[PathBuf]) -> HashMap<PathBuf, PathBuf> {
        scheduler::run_windowed(sources, BATCH_WINDOW, |source| self.generate_thumbnail(source))
            .await
    }

    /// Removes thumbnails not accessed within the configured TTL.
    ///
    /// Returns the number of removed thumbnails.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailError::Io` if the cache root cannot be listed.
    pub fn clear_old_thumbnails(&self) -> Result<usize, ThumbnailError> {
        let result = evict::sweep_expired(&self.store, self.config.ttl, SystemTime::now());
        match &result {
            Ok(deleted) => tracing::info!(deleted, "swept expired thumbnails"),
            Err(err) => tracing::warn!(error = %err, "thumbnail sweep failed"),
        }
        result
    }

    /// Removes every file from the cache root.
    ///
    /// Returns the number of removed thumbnails; stray temporary files are deleted but not counted.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailError::Io` if the cache root cannot be listed.
    pub fn clear_all_thumbnails(&self) -> Result<usize, ThumbnailError> {
        let result = evict::clear_all(&self.store);
        match &result {
            Ok(removed) => tracing::info!(removed, "cleared thumbnail cache"),
            Err(err) => tracing::warn!(error = %err, "failed to clear thumbnail cache"),
        }
        result
    }

    /// Returns the number and total size of cached thumbnails.
    #[must_use]
    pub fn get_cache_stats(&self) -> CacheStats { stats::collect(&self.store) }

    async fn try_generate(&self, source: &Path) -> Result<PathBuf, ThumbnailError> {
        let key = CacheKey::derive(source)?;

        if let Some(path) = self.cached(&key) {
            return Ok(path);
        }

        let _guard = self.inflight.acquire(&key).await;

        // Another request may have finished this key while we waited.
        if let Some(path) = self.cached(&key) {
            return Ok(path);
        }

        tracing::debug!(path = %source.display(), key = %key, "generating thumbnail");

        let generator = Arc::clone(&self.generator);
        let owned_source = source.to_path_buf();
        let bytes = run_blocking(move || generator.generate(&owned_source)).await?;

        let store = self.store.clone();
        let put_key = key.clone();
        let stored = run_blocking(move || store.put(&put_key, &bytes)).await;
        if stored.is_err() {
            self.report_unusable_root();
        }

        let path = stored?;
        tracing::debug!(key = %key, artifact = %path.display(), "stored thumbnail");
        Ok(path)
    }

    /// Looks up `key` and refreshes its access time on a hit.
    fn cached(&self, key: &CacheKey) -> Option<PathBuf> {
        let path = self.store.lookup(key)?;
        if let Err(err) = self.store.touch(key) {
            tracing::trace!(key = %key, error = %err, "failed to refresh access time");
        }
        tracing::trace!(key = %key, "thumbnail cache hit");
        Some(path)
    }

    /// Warns once when the cache root is not a usable directory.
    fn report_unusable_root(&self) {
        if self.store.root().is_dir() || self.root_warned.swap(true, Ordering::Relaxed) {
            return;
        }
        tracing::warn!(
            root = %self.store.root().display(),
            "thumbnail cache root is unusable, thumbnails will fall back to original images"
        );
    }
}

/// Runs blocking work on the blocking thread pool.
async fn run_blocking<T, F>(work: F) -> Result<T, ThumbnailError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ThumbnailError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ThumbnailError::io("blocking task", io::Error::other(err)))?
}
