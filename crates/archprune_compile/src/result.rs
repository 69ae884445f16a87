//! The outcome of compiling one unit.

use archprune_diagnostics::{Diagnostic, Severity};
use serde::{Deserialize, Serialize};

/// Emitted code, its source map, and every diagnostic the compiler reported.
///
/// A unit with errors is still a valid result: with emit-on-error disabled
/// the text fields are empty and the diagnostics explain why.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    /// Emitted code with the source-map reference line removed.
    pub emitted_source: String,
    /// Source map JSON with `file` rewritten and `sourcesContent` inlined.
    pub source_map: String,
    /// Diagnostics in the order the compiler reported them.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileResult {
    /// A result carrying only diagnostics (emit skipped).
    pub fn diagnostics_only(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            ..Self::default()
        }
    }

    /// Returns `true` if code was emitted.
    pub fn is_emitted(&self) -> bool {
        !self.emitted_source.is_empty()
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }
}
