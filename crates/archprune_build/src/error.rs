//! Error types for a build session.

use std::path::PathBuf;

use archprune_cache::CacheError;
use archprune_elide::ElideError;

/// Errors that abort processing of a file or compile unit.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A source could not be read or its pruned copy not written.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The scanner rejected the source.
    #[error(transparent)]
    Elide(#[from] ElideError),

    /// Key computation or compilation failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_display() {
        let err = BuildError::io(
            "/app/src/a.ts",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/app/src/a.ts"));
        assert!(msg.contains("denied"));
    }
}
