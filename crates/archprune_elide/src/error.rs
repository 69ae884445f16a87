//! Error types for conditional-region elision.

use crate::scanner::RegionKind;
use archprune_common::Architecture;
use std::path::PathBuf;

/// Errors raised while pruning a source file.
#[derive(Debug, thiserror::Error)]
pub enum ElideError {
    /// Input ended while a conditional region was still open.
    #[error("unterminated {kind} region opened at {}:{line} (building for {arch})", .path.display())]
    UnterminatedRegion {
        /// Logical path of the file.
        path: PathBuf,
        /// 1-based line of the region's prologue.
        line: usize,
        /// Which region was left open.
        kind: RegionKind,
        /// Architecture the file was being pruned for.
        arch: Architecture,
    },
}
