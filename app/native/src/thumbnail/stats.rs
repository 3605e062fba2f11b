//! Cache size reporting.

use serde::Serialize;

use super::store::ThumbnailStore;

/// Aggregate size of the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of cached artifacts.
    pub count: usize,
    /// Sum of artifact sizes in bytes.
    pub total_size_bytes: u64,
}

/// Counts the artifacts in `store`. An empty or unreadable root reports zeros.
#[must_use]
pub fn collect(store: &ThumbnailStore) -> CacheStats {
    match store.list_entries() {
        Ok(entries) => CacheStats {
            count: entries.len(),
            total_size_bytes: entries.iter().map(|entry| entry.size).sum(),
        },
        Err(err) => {
            tracing::warn!(root = %store.root().display(), error = %err, "failed to read cache stats");
            CacheStats::default()
        }
    }
}
