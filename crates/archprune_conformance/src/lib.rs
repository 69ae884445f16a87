//! Conformance test helpers for archprune.
//!
//! Provides a scanner shortcut, a [`RecordingCompiler`] that stands in for
//! the external compiler and counts its invocations, and a
//! [`ProjectFixture`] for on-disk sources with controlled modification
//! times.

#![warn(missing_docs)]

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use archprune_common::{ArchPolicy, Architecture, LanguageTier};
use archprune_compile::{CompileError, CompileOptions, Compiler, CompilerAdapter, RawEmit};
use archprune_diagnostics::Diagnostic;
use archprune_elide::{ElideError, ScanRules, Scanner};
use archprune_source::LogicalPath;

/// Prunes `source` with the default rules.
pub fn prune(source: &str, logical_path: &str, arch: &str) -> Result<String, ElideError> {
    prune_with(&ScanRules::default(), source, logical_path, arch)
}

/// Prunes `source` with `rules`.
pub fn prune_with(
    rules: &ScanRules,
    source: &str,
    logical_path: &str,
    arch: &str,
) -> Result<String, ElideError> {
    Scanner::new(rules.clone()).process(
        source,
        &LogicalPath::from(logical_path),
        &Architecture::new(arch),
    )
}

/// One invocation seen by a [`RecordingCompiler`].
#[derive(Clone, Debug)]
pub struct RecordedCall {
    /// Files in the order they were passed.
    pub files: Vec<PathBuf>,
    /// Tier the compile was requested at.
    pub tier: LanguageTier,
}

/// Shared view of the calls a [`RecordingCompiler`] received.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<RecordedCall>>>);

impl CallLog {
    /// Number of compiler invocations so far.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Every recorded call, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A compiler stand-in.
///
/// Emits the concatenated inputs, a `//# sourceMappingURL=` trailer, and a
/// source map listing every input by absolute path. With diagnostics set,
/// it skips emit and reports them instead.
#[derive(Default)]
pub struct RecordingCompiler {
    log: CallLog,
    diagnostics: Vec<Diagnostic>,
}

impl RecordingCompiler {
    /// Creates a compiler that always emits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `diagnostics` and skips emit on every call.
    pub fn failing(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            log: CallLog::default(),
            diagnostics,
        }
    }

    /// A handle on the calls this compiler will record.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Wraps the recorder in a [`Compiler`] with the default policy.
    pub fn into_compiler(self) -> (Compiler, CallLog) {
        let log = self.log();
        (Compiler::new(Box::new(self), ArchPolicy::default()), log)
    }
}

impl CompilerAdapter for RecordingCompiler {
    fn compile(&self, files: &[PathBuf], options: &CompileOptions) -> Result<RawEmit, CompileError> {
        self.log.lock().push(RecordedCall {
            files: files.to_vec(),
            tier: options.tier,
        });
        if !self.diagnostics.is_empty() {
            return Ok(RawEmit::skipped(self.diagnostics.clone()));
        }

        let mut code = String::new();
        for path in files {
            let text = std::fs::read_to_string(path).map_err(|e| CompileError::Io {
                path: path.clone(),
                source: e,
            })?;
            code.push_str(&text);
            code.push('\n');
        }
        code.push_str(&format!("//# sourceMappingURL={}", options.map_file()));

        let sources: Vec<String> = files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let map = serde_json::json!({
            "version": 3,
            "file": options.out_file,
            "sources": sources,
            "mappings": "",
        });
        Ok(RawEmit::emitted(code, map.to_string(), "/"))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// A temporary project directory.
pub struct ProjectFixture {
    dir: tempfile::TempDir,
}

impl ProjectFixture {
    /// Creates an empty project directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `text` to `relative`, creating parent directories, and pins
    /// its modification time to a fixed instant.
    pub fn write(&self, relative: &str, text: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, text)?;
        set_mtime(&path, 1_000)?;
        Ok(path)
    }

    /// Sets the modification time of `relative` to `secs` after the epoch.
    pub fn touch(&self, relative: &str, secs: u64) -> io::Result<()> {
        set_mtime(&self.dir.path().join(relative), secs)
    }
}

/// Sets the modification time of `path` to `secs` after the epoch.
pub fn set_mtime(path: &Path, secs: u64) -> io::Result<()> {
    File::options()
        .write(true)
        .open(path)?
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
}
