//! On-disk thumbnail store.
//!
//! Maps a [`CacheKey`] to `<root>/<key>.jpg`. Writes go to a hidden temporary file in the
//! same directory which is then renamed into place, so readers only ever see complete
//! artifacts.

use std::fs::{self, File, FileTimes};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::key::CacheKey;
use crate::constants::thumbnail::EXTENSION;
use crate::error::ThumbnailError;

/// Prefix of in-progress temporary files.
const TEMP_PREFIX: &str = ".";

/// Suffix of in-progress temporary files.
const TEMP_SUFFIX: &str = ".tmp";

/// A cached artifact as seen by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub key: CacheKey,
    pub path: PathBuf,
    pub size: u64,
    pub accessed: SystemTime,
}

/// Thumbnail storage rooted at a single directory.
#[derive(Debug, Clone)]
pub struct ThumbnailStore {
    root: PathBuf,
}

impl ThumbnailStore {
    /// Creates a store for `root`. The directory is created lazily by [`Self::put`].
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    /// Returns the cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path { &self.root }

    /// Returns the artifact path for `key`, whether or not it exists.
    #[must_use]
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(format!("{key}.{EXTENSION}"))
    }

    /// Returns the artifact path if it exists.
    #[must_use]
    pub fn lookup(&self, key: &CacheKey) -> Option<PathBuf> {
        let path = self.path_for(key);
        path.is_file().then_some(path)
    }

    /// Creates the cache root if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailError::Io` if the directory cannot be created.
    pub fn ensure_root(&self) -> Result<(), ThumbnailError> {
        fs::create_dir_all(&self.root)
            .map_err(|err| ThumbnailError::io_at("create cache root", &self.root, err))
    }

    /// Atomically stores `bytes` under `key` and returns the artifact path.
    ///
    /// A concurrent `put` for the same key is harmless: both renames install a complete file.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailError::Io` if the root cannot be created or the write fails.
    pub fn put(&self, key: &CacheKey, bytes: &[u8]) -> Result<PathBuf, ThumbnailError> {
        self.ensure_root()?;

        let target = self.path_for(key);
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.root)
            .map_err(|err| ThumbnailError::io_at("create temp file in", &self.root, err))?;

        temp.write_all(bytes)
            .and_then(|()| temp.flush())
            .map_err(|err| ThumbnailError::io_at("write", temp.path(), err))?;

        temp.persist(&target)
            .map_err(|err| ThumbnailError::io_at("rename into", &target, err.error))?;

        Ok(target)
    }

    /// Sets the access time of the artifact for `key` to now.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the artifact cannot be opened or updated.
    pub fn touch(&self, key: &CacheKey) -> io::Result<()> {
        let file = File::options().write(true).open(self.path_for(key))?;
        file.set_times(FileTimes::new().set_accessed(SystemTime::now()))
    }

    /// Deletes the artifact for `key`. Deleting a missing artifact is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailError::Io` if the file exists but cannot be removed.
    pub fn delete(&self, key: &CacheKey) -> Result<(), ThumbnailError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ThumbnailError::io_at("delete", &path, err)),
        }
    }

    /// Lists all artifacts in the cache root.
    ///
    /// Temporary files and foreign files are skipped. Entries whose metadata cannot be read
    /// are logged and skipped. A missing root yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailError::Io` if the root exists but cannot be read.
    pub fn list_entries(&self) -> Result<Vec<StoreEntry>, ThumbnailError> {
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(ThumbnailError::io_at("list", &self.root, err)),
        };

        let mut entries = Vec::new();
        for dir_entry in dir {
            let dir_entry = match dir_entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(root = %self.root.display(), error = %err, "skipping unreadable cache entry");
                    continue;
                }
            };

            let path = dir_entry.path();
            let Some(key) = artifact_key(&path) else {
                continue;
            };

            let metadata = match dir_entry.metadata() {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to stat cache entry");
                    continue;
                }
            };

            // Filesystems without atime support report the modification time instead.
            let accessed = metadata.accessed().or_else(|_| metadata.modified());
            match accessed {
                Ok(accessed) => entries.push(StoreEntry { key, path, size: metadata.len(), accessed }),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to read access time");
                }
            }
        }

        Ok(entries)
    }

    /// Removes every file in the cache root, including stray temporary files.
    ///
    /// Per-file failures are logged and skipped. Returns the number of thumbnails removed.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailError::Io` if the root exists but cannot be read.
    pub fn remove_all(&self) -> Result<usize, ThumbnailError> {
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(ThumbnailError::io_at("list", &self.root, err)),
        };

        let mut removed = 0;
        for path in dir.filter_map(Result::ok).map(|entry| entry.path()) {
            if !path.is_file() {
                continue;
            }
            let is_artifact = artifact_key(&path).is_some();
            match fs::remove_file(&path) {
                Ok(()) if is_artifact => removed += 1,
                Ok(()) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to remove cache file");
                }
            }
        }

        Ok(removed)
    }
}

/// Returns the key of an artifact path, or `None` for temp and foreign files.
fn artifact_key(path: &Path) -> Option<CacheKey> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
        return None;
    }
    path.file_stem().and_then(|stem| stem.to_str()).and_then(CacheKey::from_stem)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::thumbnail::key::SourceIdentity;

    fn key(n: u128) -> CacheKey {
        SourceIdentity { path: PathBuf::from("/walls/test.jpg"), modified_ms: n }.key()
    }

    // ========================================================================
    // lookup / put
    // ========================================================================

    #[test]
    fn test_lookup_missing_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp_dir.path());
        assert!(store.lookup(&key(1)).is_none());
    }

    #[test]
    fn test_put_creates_root_and_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nested").join("thumbnails");
        let store = ThumbnailStore::new(&root);

        let path = store.put(&key(1), b"jpeg bytes").unwrap();
        assert_eq!(path, store.path_for(&key(1)));
        assert_eq!(fs::read(&path).unwrap(), b"jpeg bytes");
        assert_eq!(store.lookup(&key(1)), Some(path));
    }

    #[test]
    fn test_put_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp_dir.path());
        store.put(&key(1), b"a").unwrap();
        store.put(&key(2), b"b").unwrap();

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|name| !name.ends_with(TEMP_SUFFIX)));
    }

    #[test]
    fn test_put_replaces_existing_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp_dir.path());
        store.put(&key(1), b"old").unwrap();
        let path = store.put(&key(1), b"new").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"new");
    }

    #[test]
    fn test_concurrent_puts_never_expose_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(ThumbnailStore::new(temp_dir.path()));
        let payload: Arc<Vec<u8>> = Arc::new((0..=255u8).cycle().take(256 * 1024).collect());

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let payload = Arc::clone(&payload);
                thread::spawn(move || {
                    for _ in 0..10 {
                        store.put(&key(7), &payload).unwrap();
                    }
                })
            })
            .collect();

        let reader = {
            let store = Arc::clone(&store);
            let payload = Arc::clone(&payload);
            thread::spawn(move || {
                for _ in 0..200 {
                    if let Some(path) = store.lookup(&key(7)) {
                        if let Ok(bytes) = fs::read(&path) {
                            assert_eq!(bytes.len(), payload.len());
                        }
                    }
                    thread::sleep(Duration::from_micros(200));
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();
        assert_eq!(fs::read(store.path_for(&key(7))).unwrap(), *payload);
    }

    #[test]
    fn test_put_into_unwritable_root_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, b"not a dir").unwrap();
        let store = ThumbnailStore::new(blocker.join("thumbnails"));

        let err = store.put(&key(1), b"x").unwrap_err();
        assert!(matches!(err, ThumbnailError::Io { .. }));
    }

    // ========================================================================
    // delete / list / remove_all
    // ========================================================================

    #[test]
    fn test_delete_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp_dir.path());
        store.put(&key(1), b"x").unwrap();

        store.delete(&key(1)).unwrap();
        assert!(store.lookup(&key(1)).is_none());
        store.delete(&key(1)).unwrap();
    }

    #[test]
    fn test_list_entries_skips_foreign_and_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp_dir.path());
        store.put(&key(1), b"abc").unwrap();
        store.put(&key(2), b"defgh").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(temp_dir.path().join(".abc123.tmp"), b"x").unwrap();
        fs::write(temp_dir.path().join("wallpaper.jpg"), b"x").unwrap();

        let mut entries = store.list_entries().unwrap();
        entries.sort_by_key(|entry| entry.size);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].size, 3);
        assert_eq!(entries[1].size, 5);
    }

    #[test]
    fn test_list_entries_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp_dir.path().join("never-created"));
        assert!(store.list_entries().unwrap().is_empty());
    }

    #[test]
    fn test_touch_updates_access_time() {
        let temp_dir = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp_dir.path());
        let path = store.put(&key(1), b"x").unwrap();

        let old = SystemTime::now() - Duration::from_secs(90 * 24 * 60 * 60);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_times(FileTimes::new().set_accessed(old))
            .unwrap();

        store.touch(&key(1)).unwrap();
        let accessed = fs::metadata(&path).unwrap().accessed().unwrap();
        assert!(accessed > old + Duration::from_secs(60));
    }

    #[test]
    fn test_remove_all_counts_only_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp_dir.path());
        store.put(&key(1), b"x").unwrap();
        store.put(&key(2), b"y").unwrap();
        let stray = temp_dir.path().join(".stray.tmp");
        fs::write(&stray, b"z").unwrap();

        assert_eq!(store.remove_all().unwrap(), 2);
        assert!(store.list_entries().unwrap().is_empty());
        assert!(!stray.exists());
    }

    #[test]
    fn test_remove_all_missing_root_is_zero() {
        let temp_dir = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp_dir.path().join("absent"));
        assert_eq!(store.remove_all().unwrap(), 0);
    }

    #[test]
    fn test_artifact_key_requires_extension_and_hex_stem() {
        let name = format!("{}.{EXTENSION}", key(3));
        assert!(artifact_key(Path::new(&name)).is_some());
        assert!(artifact_key(Path::new(&format!("{}.png", key(3)))).is_none());
        assert!(artifact_key(Path::new("cover.jpg")).is_none());
    }
}
