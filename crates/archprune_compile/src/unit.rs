//! The set of pruned files compiled together.

use archprune_common::Architecture;
use std::path::PathBuf;

/// Pruned files of one package for one architecture, in registration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileUnit {
    /// Target architecture.
    pub arch: Architecture,
    /// Name written into the source map's `file` field.
    pub output_name: String,
    /// Absolute paths of the pruned copies.
    pub files: Vec<PathBuf>,
}

impl CompileUnit {
    /// Creates an empty unit.
    pub fn new(arch: impl Into<Architecture>, output_name: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            output_name: output_name.into(),
            files: Vec::new(),
        }
    }

    /// Replaces the file list.
    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }

    /// Appends a file.
    pub fn push_file(&mut self, path: impl Into<PathBuf>) {
        self.files.push(path.into());
    }

    /// Returns `true` if no files were registered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
