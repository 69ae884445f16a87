//! Diagnostic records, severity management, and terminal rendering.
//!
//! Compiler diagnostics are the only soft failure channel of the pipeline:
//! they travel with the compile result as structured [`Diagnostic`] values,
//! accumulate in a [`DiagnosticSink`], and are formatted by a
//! [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
