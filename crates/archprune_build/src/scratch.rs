//! Where pruned copies live.

use std::path::{Component, Path, PathBuf};

use archprune_common::Architecture;

use crate::error::BuildError;

/// Per-architecture scratch tree mirroring input paths.
///
/// `/app/src/lib/a.ts` built for `web.browser` lands at
/// `<root>/web.browser/app/src/lib/a.ts`. Each architecture has its own
/// subtree, so concurrent builds for different architectures never write the
/// same file.
#[derive(Clone, Debug)]
pub struct ScratchLayout {
    root: PathBuf,
}

impl ScratchLayout {
    /// Creates a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The scratch root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scratch location of `full_path` for `arch`, without touching disk.
    ///
    /// `:` (drive letters) becomes `_`; root and prefix components are
    /// dropped so the whole input path nests below the architecture.
    pub fn path_for(&self, full_path: &Path, arch: &Architecture) -> PathBuf {
        let normalized = full_path.to_string_lossy().replace(':', "_");
        let mut out = self.root.join(arch.as_str());
        for component in Path::new(&normalized).components() {
            match component {
                Component::Normal(part) => out.push(part),
                Component::ParentDir => out.push(".."),
                Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            }
        }
        out
    }

    /// Like [`path_for`](Self::path_for), creating parent directories.
    pub fn prepare(&self, full_path: &Path, arch: &Architecture) -> Result<PathBuf, BuildError> {
        let path = self.path_for(full_path, arch);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        Ok(path)
    }
}
