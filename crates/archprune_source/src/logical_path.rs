//! Architecture-root-relative paths as supplied by the source feed.

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A file path relative to its package root, e.g. `client/views/main.ts`.
///
/// The first segment decides whether a file is already pinned to one
/// environment by its placement (a `client/` or `server/` directory).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LogicalPath(PathBuf);

impl LogicalPath {
    /// Wraps a relative path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// The underlying path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// The first normal segment, skipping any leading `./`.
    pub fn first_segment(&self) -> Option<&str> {
        self.0.components().find_map(|c| match c {
            Component::Normal(seg) => seg.to_str(),
            _ => None,
        })
    }

    /// Returns `true` if the first segment is one of `roots`.
    pub fn is_under_any<S: AsRef<str>>(&self, roots: &[S]) -> bool {
        match self.first_segment() {
            Some(first) => roots.iter().any(|r| r.as_ref() == first),
            None => false,
        }
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for LogicalPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for LogicalPath {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for LogicalPath {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}
