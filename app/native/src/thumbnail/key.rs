//! Cache key derivation.
//!
//! A key is the SHA-256 hex digest of a source file's normalized path and its modification
//! time in milliseconds. Touching or renaming a file therefore produces a new key, even when
//! the bytes are unchanged.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::error::ThumbnailError;
use crate::platform::path::absolutize;

/// Length of a hex-encoded SHA-256 digest.
pub const KEY_LEN: usize = 64;

/// Identity of a source file at the time of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIdentity {
    /// Canonical absolute path.
    pub path: PathBuf,
    /// Last modification time, milliseconds since the Unix epoch.
    pub modified_ms: u128,
}

impl SourceIdentity {
    /// Reads the identity of `source` from the filesystem.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailError::SourceNotFound` if the file is missing, or
    /// `ThumbnailError::Io` if its metadata cannot be read.
    pub fn read(source: &Path) -> Result<Self, ThumbnailError> {
        let metadata = fs::metadata(source).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ThumbnailError::SourceNotFound(source.to_path_buf()),
            _ => ThumbnailError::io_at("stat", source, err),
        })?;

        if !metadata.is_file() {
            return Err(ThumbnailError::SourceNotFound(source.to_path_buf()));
        }

        let modified = metadata.modified().map_err(|err| ThumbnailError::io_at("mtime", source, err))?;
        let path = fs::canonicalize(source).unwrap_or_else(|_| absolutize(source));

        Ok(Self { path, modified_ms: millis_since_epoch(modified) })
    }

    /// Computes the cache key of this identity.
    #[must_use]
    pub fn key(&self) -> CacheKey {
        let mut hasher = Sha256::new();
        hasher.update(self.path.as_os_str().as_encoded_bytes());
        // Separator keeps "/a/b1" + "23" distinct from "/a/b12" + "3".
        hasher.update([0u8]);
        hasher.update(self.modified_ms.to_string().as_bytes());
        CacheKey(hex::encode(hasher.finalize()))
    }
}

/// Pre-epoch timestamps collapse to zero.
fn millis_since_epoch(time: SystemTime) -> u128 {
    time.duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_millis())
}

/// A fixed-length lowercase hex cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for `source`.
    ///
    /// # Errors
    ///
    /// See [`SourceIdentity::read`].
    pub fn derive(source: &Path) -> Result<Self, ThumbnailError> {
        SourceIdentity::read(source).map(|identity| identity.key())
    }

    /// Parses a key from an artifact file stem.
    ///
    /// Returns `None` for anything that is not a 64-character lowercase hex string.
    #[must_use]
    pub fn from_stem(stem: &str) -> Option<Self> {
        let valid = stem.len() == KEY_LEN
            && stem.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(stem.to_string()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}
