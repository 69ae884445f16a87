//! One input file bound to the architecture it is being built for.

use crate::logical_path::LogicalPath;
use archprune_common::Architecture;
use std::path::PathBuf;

/// A source file as delivered by the source feed.
///
/// Identity is `(full_path, arch)`: the same file is registered once per
/// target architecture and pruned separately for each.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    /// Absolute path of the original file on disk.
    pub full_path: PathBuf,
    /// Path relative to the package root, used for environment-root detection.
    pub logical_path: LogicalPath,
    /// Target architecture of this build.
    pub arch: Architecture,
    /// Package or compile-unit id the file belongs to.
    pub package: Option<String>,
    /// `false` when the file opted out of transpilation.
    pub transpile: bool,
}

impl SourceUnit {
    /// Creates a unit with no package and transpilation enabled.
    pub fn new(
        full_path: impl Into<PathBuf>,
        logical_path: impl Into<LogicalPath>,
        arch: impl Into<Architecture>,
    ) -> Self {
        Self {
            full_path: full_path.into(),
            logical_path: logical_path.into(),
            arch: arch.into(),
            package: None,
            transpile: true,
        }
    }

    /// Sets the owning package id.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Sets whether this file is transpiled at all.
    pub fn with_transpile(mut self, transpile: bool) -> Self {
        self.transpile = transpile;
        self
    }
}
