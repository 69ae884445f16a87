//! Structured diagnostic messages with severity, code, and location.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use archprune_source::ResolvedLocation;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
///
/// Compiler diagnostics always carry a location; global ones (a missing
/// input file, a bad option) have none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The message text. Multi-part compiler message chains are flattened
    /// with `\n`.
    pub message: String,
    /// Where the problem was found.
    pub location: Option<ResolvedLocation>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with the given severity, code, and message.
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            notes: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Attaches a source location.
    pub fn with_location(mut self, location: ResolvedLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}
