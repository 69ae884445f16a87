//! Project resolution: anchoring configured directories at the project root.

use crate::types::ProjectConfig;
use archprune_common::{ArchPolicy, Architecture};
use std::path::{Path, PathBuf};

/// Project settings with every directory made absolute.
#[derive(Debug, Clone)]
pub struct ResolvedProject {
    /// The project name.
    pub name: String,
    /// The directory holding `archprune.toml`.
    pub root: PathBuf,
    /// Where sources are discovered.
    pub source_dir: PathBuf,
    /// Where emitted code is written.
    pub output_dir: PathBuf,
    /// Root of the per-architecture scratch tree.
    pub scratch_root: PathBuf,
    /// Server/client classification.
    pub policy: ArchPolicy,
    /// Architectures built by default.
    pub targets: Vec<Architecture>,
}

impl ResolvedProject {
    /// Output naming hint for the bundle, `<name>.js`.
    pub fn output_name(&self) -> String {
        format!("{}.js", self.name)
    }
}

/// Resolves configured relative directories against `root`.
///
/// A relative `root` is anchored at the current directory first, so every
/// resolved directory is absolute. Absolute directories in the
/// configuration are kept as given.
pub fn resolve_project(config: &ProjectConfig, root: &Path) -> ResolvedProject {
    let root = absolute_root(root);
    let root = root.as_path();
    ResolvedProject {
        name: config.project.name.clone(),
        root: root.to_path_buf(),
        source_dir: root.join(&config.project.source_dir),
        output_dir: root.join(&config.project.output_dir),
        scratch_root: root.join(&config.scratch.root),
        policy: ArchPolicy::new(config.arch.server.as_str()),
        targets: config
            .arch
            .targets
            .iter()
            .map(|t| Architecture::new(t.as_str()))
            .collect(),
    }
}

/// `root` made absolute; an empty path means the current directory.
fn absolute_root(root: &Path) -> PathBuf {
    let root = if root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        root
    };
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}
