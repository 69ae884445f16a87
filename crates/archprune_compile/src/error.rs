//! Error types for compiler invocation and post-processing.

use std::path::PathBuf;

/// Errors that abort a compile. Compiler diagnostics are not errors; they
/// are part of the [`CompileResult`](crate::CompileResult).
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The compiler program could not be started.
    #[error("failed to run compiler `{program}`: {source}")]
    Spawn {
        /// The program that was invoked.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A file the compile needed could not be read or written.
    #[error("compiler I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The emitted source map was not usable.
    #[error("invalid source map: {reason}")]
    SourceMap {
        /// Description of the problem.
        reason: String,
    },

    /// The compiler exited unsuccessfully without reporting any diagnostic.
    #[error("compiler `{program}` failed ({status}): {stderr}")]
    Failed {
        /// The program that was invoked.
        program: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },
}
