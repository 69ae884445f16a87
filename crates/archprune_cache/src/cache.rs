//! The per-architecture compile cache.
//!
//! One entry per architecture holds the key of the unit last compiled for it
//! and the result. A lookup recomputes the key from the filesystem; a match
//! returns the stored result without touching the compiler, anything else
//! compiles and overwrites the entry. Results with diagnostics are cached
//! like clean ones.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use archprune_common::Architecture;
use archprune_compile::{CompileResult, CompileUnit, Compiler};
use tracing::debug;

use crate::error::CacheError;
use crate::key::CacheKey;

/// Hit and miss counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from a stored entry.
    pub hits: u64,
    /// Lookups that invoked the compiler.
    pub misses: u64,
}

struct CacheEntry {
    key: CacheKey,
    result: Arc<CompileResult>,
}

/// Last compile result for each architecture.
///
/// Owned by the build process and passed to whoever compiles; a fresh
/// instance starts empty. Entries are overwritten on key change and never
/// evicted.
#[derive(Default)]
pub struct CompileCache {
    entries: HashMap<Architecture, CacheEntry>,
    stats: CacheStats,
}

impl CompileCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the result for `unit`, compiling only if its key changed.
    ///
    /// The entry is keyed by `unit.arch`; units for different architectures
    /// never invalidate each other.
    #[tracing::instrument(level = "debug", skip_all, fields(arch = %unit.arch, files = unit.files.len()))]
    pub fn get(
        &mut self,
        unit: &CompileUnit,
        compiler: &Compiler,
    ) -> Result<Arc<CompileResult>, CacheError> {
        let key = CacheKey::compute(&unit.files)?;

        if let Some(entry) = self.entries.get(&unit.arch) {
            if entry.key == key {
                self.stats.hits += 1;
                debug!(key = %key.fingerprint().short(), "cache hit");
                return Ok(Arc::clone(&entry.result));
            }
        }

        self.stats.misses += 1;
        debug!(key = %key.fingerprint().short(), "cache miss, compiling");
        let result = Arc::new(compiler.compile(unit)?);
        self.entries.insert(
            unit.arch.clone(),
            CacheEntry {
                key,
                result: Arc::clone(&result),
            },
        );
        Ok(result)
    }

    /// Hit and miss counts since creation.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of architectures with a stored entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A [`CompileCache`] usable from several threads.
///
/// The whole key-compare-compile-store sequence runs under one lock, so a
/// given key is compiled at most once even when threads race.
#[derive(Default)]
pub struct SharedCompileCache {
    inner: Mutex<CompileCache>,
}

impl SharedCompileCache {
    /// Creates an empty shared cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locked [`CompileCache::get`].
    pub fn get(
        &self,
        unit: &CompileUnit,
        compiler: &Compiler,
    ) -> Result<Arc<CompileResult>, CacheError> {
        self.lock().get(unit, compiler)
    }

    /// Hit and miss counts since creation.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CompileCache> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archprune_common::ArchPolicy;
    use archprune_compile::{CompileError, CompileOptions, CompilerAdapter, RawEmit};
    use archprune_diagnostics::{Diagnostic, DiagnosticCode};
    use std::fs::File;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, SystemTime};

    struct Counting {
        calls: Arc<AtomicUsize>,
        diagnostics: Vec<Diagnostic>,
    }

    impl CompilerAdapter for Counting {
        fn compile(&self, files: &[PathBuf], _options: &CompileOptions) -> Result<RawEmit, CompileError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.diagnostics.is_empty() {
                return Ok(RawEmit::skipped(self.diagnostics.clone()));
            }
            Ok(RawEmit {
                emitted: Some(format!("// build {n} of {} files\n", files.len())),
                ..RawEmit::default()
            })
        }
    }

    fn counting(diagnostics: Vec<Diagnostic>) -> (Compiler, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let adapter = Counting {
            calls: Arc::clone(&calls),
            diagnostics,
        };
        (Compiler::new(Box::new(adapter), ArchPolicy::default()), calls)
    }

    fn touch(path: &Path, secs: u64) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn fixture(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, "let x = 1;\n").unwrap();
                touch(&path, 1_000);
                path
            })
            .collect()
    }

    #[test]
    fn unchanged_unit_compiles_once() {
        let dir = tempfile::tempdir().unwrap();
        let unit = CompileUnit::new("os", "app.js").with_files(fixture(dir.path(), &["a.ts", "b.ts"]));
        let (compiler, calls) = counting(Vec::new());
        let mut cache = CompileCache::new();

        let first = cache.get(&unit, &compiler).unwrap();
        let second = cache.get(&unit, &compiler).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn touched_file_forces_one_recompile() {
        let dir = tempfile::tempdir().unwrap();
        let files = fixture(dir.path(), &["a.ts", "b.ts"]);
        let unit = CompileUnit::new("os", "app.js").with_files(files.clone());
        let (compiler, calls) = counting(Vec::new());
        let mut cache = CompileCache::new();

        cache.get(&unit, &compiler).unwrap();
        touch(&files[1], 2_000);
        let fresh = cache.get(&unit, &compiler).unwrap();
        cache.get(&unit, &compiler).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(fresh.emitted_source.contains("build 2"));
    }

    #[test]
    fn membership_change_recompiles() {
        let dir = tempfile::tempdir().unwrap();
        let files = fixture(dir.path(), &["a.ts", "b.ts"]);
        let (compiler, calls) = counting(Vec::new());
        let mut cache = CompileCache::new();

        cache
            .get(&CompileUnit::new("os", "app.js").with_files(files.clone()), &compiler)
            .unwrap();
        cache
            .get(&CompileUnit::new("os", "app.js").with_files(files[..1].to_vec()), &compiler)
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn architectures_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let server_files = fixture(dir.path(), &["os_a.ts"]);
        let client_files = fixture(dir.path(), &["web_a.ts"]);
        let server = CompileUnit::new("os", "app.js").with_files(server_files.clone());
        let client = CompileUnit::new("web.browser", "app.js").with_files(client_files);
        let (compiler, calls) = counting(Vec::new());
        let mut cache = CompileCache::new();

        cache.get(&server, &compiler).unwrap();
        cache.get(&client, &compiler).unwrap();
        assert_eq!(cache.len(), 2);

        touch(&server_files[0], 5_000);
        cache.get(&server, &compiler).unwrap();
        cache.get(&client, &compiler).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 3 });
    }

    #[test]
    fn diagnostics_are_cached() {
        let dir = tempfile::tempdir().unwrap();
        let unit = CompileUnit::new("web.browser", "app.js").with_files(fixture(dir.path(), &["a.ts"]));
        let diags = vec![Diagnostic::error(
            DiagnosticCode::compiler(2304),
            "Cannot find name 'foo'.",
        )];
        let (compiler, calls) = counting(diags.clone());
        let mut cache = CompileCache::new();

        let first = cache.get(&unit, &compiler).unwrap();
        let second = cache.get(&unit, &compiler).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.diagnostics, diags);
        assert!(!first.is_emitted());
    }

    #[test]
    fn vanished_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let files = fixture(dir.path(), &["a.ts"]);
        let unit = CompileUnit::new("os", "app.js").with_files(files.clone());
        let (compiler, calls) = counting(Vec::new());
        let mut cache = CompileCache::new();

        cache.get(&unit, &compiler).unwrap();
        std::fs::remove_file(&files[0]).unwrap();
        let err = cache.get(&unit, &compiler).unwrap_err();
        assert!(matches!(err, CacheError::Stat { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shared_cache_compiles_once_across_threads() {
        let dir = tempfile::tempdir().unwrap();
        let unit = CompileUnit::new("os", "app.js").with_files(fixture(dir.path(), &["a.ts"]));
        let (compiler, calls) = counting(Vec::new());
        let cache = SharedCompileCache::new();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| cache.get(&unit, &compiler).unwrap());
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 3, misses: 1 });
    }
}
