//! Cache eviction.
//!
//! Neither sweep runs on its own; the host application decides when to call them.

use std::time::{Duration, SystemTime};

use super::store::ThumbnailStore;
use crate::error::ThumbnailError;

/// Deletes every artifact whose last access is older than `ttl` as of `now`.
///
/// Failures on single entries are logged and skipped. Returns the number of deleted entries.
///
/// # Errors
///
/// Returns `ThumbnailError::Io` only if the cache root cannot be listed.
pub fn sweep_expired(
    store: &ThumbnailStore,
    ttl: Duration,
    now: SystemTime,
) -> Result<usize, ThumbnailError> {
    let cutoff = now.checked_sub(ttl).unwrap_or(SystemTime::UNIX_EPOCH);
    let mut deleted = 0;

    for entry in store.list_entries()? {
        if entry.accessed >= cutoff {
            continue;
        }

        match store.delete(&entry.key) {
            Ok(()) => {
                tracing::debug!(key = %entry.key, size = entry.size, "evicted expired thumbnail");
                deleted += 1;
            }
            Err(err) => {
                tracing::warn!(key = %entry.key, error = %err, "failed to evict thumbnail");
            }
        }
    }

    Ok(deleted)
}

/// Deletes every file in the cache root. Returns the number of removed thumbnails.
///
/// # Errors
///
/// Returns `ThumbnailError::Io` only if the cache root cannot be listed.
pub fn clear_all(store: &ThumbnailStore) -> Result<usize, ThumbnailError> { store.remove_all() }
