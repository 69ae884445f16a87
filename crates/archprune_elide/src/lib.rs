//! Architecture-conditional dead-code elision.
//!
//! A single source file can carry client-only and server-only regions, each
//! opened by a literal prologue such as `if (Meteor.isClient) {` and closed
//! by its matching `}`. The [`Scanner`] produces, per target architecture, a
//! copy of the file in which the matching regions are unwrapped and the
//! other regions are removed entirely.
//!
//! The scan is a single character-at-a-time pass. [`SuffixMatchBuffer`]
//! recognizes multi-character tokens as they complete, and [`OutputBuffer`]
//! lets the scanner take back characters it has already written once it
//! learns they belong to a prologue, a closing brace, or a dropped region.

#![warn(missing_docs)]

pub mod error;
pub mod output;
pub mod rules;
pub mod scanner;
pub mod suffix;

pub use archprune_config::UnterminatedMode;
pub use error::ElideError;
pub use output::OutputBuffer;
pub use rules::ScanRules;
pub use scanner::{RegionKind, ScanState, Scanner, SubState};
pub use suffix::SuffixMatchBuffer;
