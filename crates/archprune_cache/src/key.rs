//! Cache keys: membership plus freshness of a compile unit.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use archprune_common::ContentHash;

use crate::error::CacheError;

/// `path:mtime_ms:` for every file of a unit, concatenated in order.
///
/// Equal file lists with equal modification times give equal keys; editing,
/// adding, removing or reordering a file changes the key.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CacheKey(String);

impl CacheKey {
    /// Computes the key for `files` by stat'ing each of them.
    ///
    /// A file that disappeared since registration is an error; no stale
    /// fallback is used.
    pub fn compute(files: &[PathBuf]) -> Result<Self, CacheError> {
        let mut key = String::new();
        for path in files {
            let millis = modified_millis(path)?;
            key.push_str(&path.to_string_lossy());
            key.push(':');
            key.push_str(&millis.to_string());
            key.push(':');
        }
        Ok(Self(key))
    }

    /// The raw key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A fixed-size hash of the key for logging.
    pub fn fingerprint(&self) -> ContentHash {
        ContentHash::from_bytes(self.0.as_bytes())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last modification time of `path` in milliseconds since the Unix epoch.
///
/// Times before the epoch count as zero.
fn modified_millis(path: &Path) -> Result<u128, CacheError> {
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| CacheError::Stat {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0))
}
