//! The seam to the external compiler.

use crate::error::CompileError;
use crate::options::CompileOptions;
use archprune_diagnostics::Diagnostic;
use std::path::{Path, PathBuf};

/// What a compiler run produced, before post-processing.
#[derive(Clone, Debug, Default)]
pub struct RawEmit {
    /// Emitted code, or `None` when emit was skipped.
    pub emitted: Option<String>,
    /// Source map JSON, when emitted.
    pub source_map: Option<String>,
    /// Every diagnostic, in reporting order.
    pub diagnostics: Vec<Diagnostic>,
    /// Directory that relative `sources` entries of the map resolve against.
    pub source_base: PathBuf,
}

impl RawEmit {
    /// A run that emitted code and a map.
    pub fn emitted(
        code: impl Into<String>,
        source_map: impl Into<String>,
        source_base: impl Into<PathBuf>,
    ) -> Self {
        Self {
            emitted: Some(code.into()),
            source_map: Some(source_map.into()),
            diagnostics: Vec::new(),
            source_base: source_base.into(),
        }
    }

    /// A run whose emit was skipped.
    pub fn skipped(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            ..Self::default()
        }
    }

    /// Returns `true` if the compiler skipped emit.
    pub fn emit_skipped(&self) -> bool {
        self.emitted.is_none()
    }
}

/// Turns source files into emitted code plus diagnostics.
///
/// Implementations run synchronously to completion. Diagnostics belong in
/// [`RawEmit::diagnostics`]; an `Err` means the compiler could not be run
/// at all.
pub trait CompilerAdapter: Send + Sync {
    /// Compiles `files` (absolute paths, in order) with `options`.
    fn compile(&self, files: &[PathBuf], options: &CompileOptions) -> Result<RawEmit, CompileError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "compiler"
    }
}

/// Reads a file, mapping failures to [`CompileError::Io`].
pub(crate) fn read_to_string(path: &Path) -> Result<String, CompileError> {
    std::fs::read_to_string(path).map_err(|e| CompileError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
