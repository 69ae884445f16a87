//! Path-keyed store of source text consulted when rendering diagnostics.

use crate::source_file::SourceFile;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Owns the text of every file a diagnostic may point into.
///
/// Compiler diagnostics arrive as `(path, line, column)`; the renderer asks
/// the database for the line text to quote under the location.
pub struct SourceDb {
    files: HashMap<PathBuf, SourceFile>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    /// Loads a source file from the filesystem. Reloading a path replaces it.
    pub fn load_file(&mut self, path: &Path) -> Result<(), io::Error> {
        let content = std::fs::read_to_string(path)?;
        self.add_source(path, content);
        Ok(())
    }

    /// Adds a source file from an in-memory string.
    pub fn add_source(&mut self, path: impl Into<PathBuf>, content: String) {
        let path = path.into();
        self.files
            .insert(path.clone(), SourceFile::new(path, content));
    }

    /// Returns the file registered under `path`, if any.
    pub fn get_file(&self, path: &Path) -> Option<&SourceFile> {
        self.files.get(path)
    }

    /// Returns the text of a 1-indexed line in the file at `path`.
    pub fn line_text(&self, path: &Path, line: u32) -> Option<&str> {
        self.get_file(path)?.line_text(line)
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no files are held.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}
