//! Per-key de-duplication of concurrent generations.
//!
//! The first request for a key takes its lock and generates; concurrent requests for the
//! same key wait on the lock and then find the finished artifact in the store. Entries are
//! dropped from the map once nobody holds or waits on them.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::key::CacheKey;

type KeyLock = Arc<Mutex<()>>;

/// Map of keys with a generation in progress.
#[derive(Debug, Default)]
pub struct InFlight {
    locks: Arc<DashMap<CacheKey, KeyLock>>,
}

impl InFlight {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Waits until the caller is the only holder for `key`.
    pub async fn acquire(&self, key: &CacheKey) -> InFlightGuard {
        // Clone out of the shard before awaiting so the map is never locked across an await.
        let lock = Arc::clone(self.locks.entry(key.clone()).or_default().value());
        let guard = lock.lock_owned().await;

        InFlightGuard {
            locks: Arc::clone(&self.locks),
            key: key.clone(),
            guard: Some(guard),
        }
    }

    /// Number of keys currently tracked.
    #[must_use]
    pub fn len(&self) -> usize { self.locks.len() }

    /// Whether no key is currently tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.locks.is_empty() }
}

/// Holds the lock for one key; releases it and prunes the map on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    locks: Arc<DashMap<CacheKey, KeyLock>>,
    key: CacheKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // One reference left means only the map holds it: no waiters.
        self.locks.remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
