//! Error types for cache lookups.

use std::path::PathBuf;

use archprune_compile::CompileError;

/// Errors that abort a cache lookup.
///
/// Compiler diagnostics are not errors; they are cached with the result.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A file of the unit could not be stat'ed while computing the key.
    #[error("cannot read modification time of {path}: {source}")]
    Stat {
        /// The file that could not be inspected.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compiler could not be run.
    #[error(transparent)]
    Compile(#[from] CompileError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_error_display() {
        let err = CacheError::Stat {
            path: PathBuf::from("/tmp/os/a.ts"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("modification time"));
        assert!(msg.contains("/tmp/os/a.ts"));
    }

    #[test]
    fn compile_error_is_transparent() {
        let err: CacheError = CompileError::SourceMap {
            reason: "not an object".to_string(),
        }
        .into();
        assert!(err.to_string().contains("not an object"));
    }
}
