//! Accumulating and finalizing compile units.

use std::path::PathBuf;

use archprune_cache::CompileCache;
use archprune_common::Architecture;
use archprune_compile::{CompileUnit, Compiler};
use archprune_diagnostics::Diagnostic;
use archprune_elide::Scanner;
use archprune_source::{LogicalPath, SourceUnit};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::BuildError;
use crate::scratch::ScratchLayout;

/// Emitted code to register with the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    /// Output path, the finalize input path with `.js` appended.
    pub path: PathBuf,
    /// The finalize input path.
    pub source_path: PathBuf,
    /// Emitted code.
    pub data: String,
    /// Source map JSON.
    pub source_map: String,
}

/// What finalizing a compile unit produced.
#[derive(Clone, Debug, Serialize)]
pub struct BuildOutput {
    /// Architecture the unit was compiled for.
    pub arch: Architecture,
    /// Every compiler diagnostic, in reporting order.
    pub diagnostics: Vec<Diagnostic>,
    /// The output, present only when the compiler emitted code.
    pub file: Option<OutputFile>,
}

impl BuildOutput {
    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}

/// One pass of the source feed: files in, compiled units out.
///
/// Files accumulate until [`finalize`](Self::finalize); a file from a
/// different package than its predecessor discards what was accumulated.
pub struct BuildSession {
    scanner: Scanner,
    scratch: ScratchLayout,
    package: Option<String>,
    files: Vec<PathBuf>,
}

impl BuildSession {
    /// Creates a session with an empty unit.
    pub fn new(scanner: Scanner, scratch: ScratchLayout) -> Self {
        Self {
            scanner,
            scratch,
            package: None,
            files: Vec::new(),
        }
    }

    /// Scratch paths registered since the last finalize or reset.
    pub fn pending(&self) -> &[PathBuf] {
        &self.files
    }

    /// Drops every pending file without compiling.
    pub fn reset(&mut self) {
        self.files.clear();
    }

    /// Prunes `source` for its architecture and adds the copy to the unit.
    ///
    /// Returns the scratch path written, or `None` when the file opted out
    /// of transpilation.
    pub fn register_file(&mut self, source: &SourceUnit) -> Result<Option<PathBuf>, BuildError> {
        if !source.transpile {
            debug!(path = %source.full_path.display(), "transpile disabled, skipped");
            return Ok(None);
        }

        if self.package != source.package {
            if !self.files.is_empty() {
                debug!(
                    discarded = self.files.len(),
                    package = source.package.as_deref().unwrap_or("<app>"),
                    "package changed, unit reset"
                );
            }
            self.package = source.package.clone();
            self.reset();
        }

        let text = std::fs::read_to_string(&source.full_path)
            .map_err(|e| BuildError::io(&source.full_path, e))?;
        let pruned = self
            .scanner
            .process(&text, &source.logical_path, &source.arch)?;

        let scratch = self.scratch.prepare(&source.full_path, &source.arch)?;
        // An identical copy keeps its mtime, and with it the cache key.
        if std::fs::read_to_string(&scratch).is_ok_and(|old| old == pruned) {
            debug!(scratch = %scratch.display(), "pruned copy unchanged");
        } else {
            std::fs::write(&scratch, pruned).map_err(|e| BuildError::io(&scratch, e))?;
            debug!(scratch = %scratch.display(), "pruned copy written");
        }

        self.files.push(scratch.clone());
        Ok(Some(scratch))
    }

    /// Compiles the accumulated unit for `arch` and starts a new one.
    ///
    /// `input_path` names the output (`<input_path>.js`); `output_name` goes
    /// into the source map. An empty unit is not compiled.
    #[tracing::instrument(level = "debug", skip_all, fields(arch = %arch, files = self.files.len()))]
    pub fn finalize(
        &mut self,
        arch: &Architecture,
        input_path: &LogicalPath,
        output_name: &str,
        cache: &mut CompileCache,
        compiler: &Compiler,
    ) -> Result<BuildOutput, BuildError> {
        let files = std::mem::take(&mut self.files);
        if files.is_empty() {
            debug!("nothing registered, compile skipped");
            return Ok(BuildOutput {
                arch: arch.clone(),
                diagnostics: Vec::new(),
                file: None,
            });
        }

        let unit = CompileUnit::new(arch.clone(), output_name).with_files(files);
        let result = cache.get(&unit, compiler)?;
        info!(
            diagnostics = result.diagnostics.len(),
            emitted = result.is_emitted(),
            "unit compiled"
        );

        let file = result.is_emitted().then(|| {
            let mut path = input_path.as_path().as_os_str().to_owned();
            path.push(".js");
            OutputFile {
                path: PathBuf::from(path),
                source_path: input_path.as_path().to_path_buf(),
                data: result.emitted_source.clone(),
                source_map: result.source_map.clone(),
            }
        });

        Ok(BuildOutput {
            arch: arch.clone(),
            diagnostics: result.diagnostics.clone(),
            file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archprune_common::ArchPolicy;
    use archprune_compile::{CompileError, CompileOptions, CompilerAdapter, RawEmit};
    use archprune_diagnostics::DiagnosticCode;
    use archprune_elide::{ElideError, ScanRules};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    /// Concatenates its inputs and remembers every file list it was given.
    struct Concat {
        seen: Arc<Mutex<Vec<Vec<PathBuf>>>>,
        fail_with: Option<Diagnostic>,
    }

    impl CompilerAdapter for Concat {
        fn compile(&self, files: &[PathBuf], _options: &CompileOptions) -> Result<RawEmit, CompileError> {
            self.seen.lock().unwrap().push(files.to_vec());
            if let Some(diag) = &self.fail_with {
                return Ok(RawEmit::skipped(vec![diag.clone()]));
            }
            let mut code = String::new();
            for f in files {
                code.push_str(&std::fs::read_to_string(f).unwrap());
            }
            Ok(RawEmit {
                emitted: Some(code),
                ..RawEmit::default()
            })
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        session: BuildSession,
        cache: CompileCache,
        compiler: Compiler,
        seen: Arc<Mutex<Vec<Vec<PathBuf>>>>,
    }

    fn fixture(fail_with: Option<Diagnostic>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let compiler = Compiler::new(
            Box::new(Concat {
                seen: Arc::clone(&seen),
                fail_with,
            }),
            ArchPolicy::default(),
        );
        let session = BuildSession::new(
            Scanner::new(ScanRules::default()),
            ScratchLayout::new(dir.path().join("scratch")),
        );
        Fixture {
            dir,
            session,
            cache: CompileCache::new(),
            compiler,
            seen,
        }
    }

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join("src").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, text).unwrap();
        path
    }

    const SHARED: &str = "a();\nif (Meteor.isServer) { b(); }\nc();";

    #[test]
    fn registers_pruned_copy() {
        let mut fx = fixture(None);
        let src = write(fx.dir.path(), "lib/shared.ts", SHARED);
        let unit = SourceUnit::new(&src, "lib/shared.ts", "web.browser");

        let scratch = fx.session.register_file(&unit).unwrap().unwrap();
        assert_eq!(std::fs::read_to_string(&scratch).unwrap(), "a();\n\nc();");
        assert!(scratch.starts_with(fx.dir.path().join("scratch").join("web.browser")));
        assert_eq!(fx.session.pending(), &[scratch]);
    }

    #[test]
    fn finalize_compiles_and_resets() {
        let mut fx = fixture(None);
        let src = write(fx.dir.path(), "lib/shared.ts", SHARED);
        fx.session
            .register_file(&SourceUnit::new(&src, "lib/shared.ts", "os"))
            .unwrap();

        let out = fx
            .session
            .finalize(
                &"os".into(),
                &LogicalPath::from("todos"),
                "todos.js",
                &mut fx.cache,
                &fx.compiler,
            )
            .unwrap();

        let file = out.file.unwrap();
        assert_eq!(file.path, PathBuf::from("todos.js"));
        assert_eq!(file.source_path, PathBuf::from("todos"));
        assert_eq!(file.data, "a();\n b(); \nc();");
        assert!(fx.session.pending().is_empty());
    }

    #[test]
    fn transpile_opt_out_is_skipped() {
        let mut fx = fixture(None);
        let src = write(fx.dir.path(), "a.ts", SHARED);
        let unit = SourceUnit::new(&src, "a.ts", "os").with_transpile(false);
        assert!(fx.session.register_file(&unit).unwrap().is_none());
        assert!(fx.session.pending().is_empty());
    }

    #[test]
    fn reset_drops_pending_files() {
        let mut fx = fixture(None);
        let src = write(fx.dir.path(), "a.ts", SHARED);
        fx.session
            .register_file(&SourceUnit::new(&src, "a.ts", "os"))
            .unwrap();
        fx.session.reset();
        assert!(fx.session.pending().is_empty());
        assert!(fx.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn package_change_discards_unit() {
        let mut fx = fixture(None);
        let a = write(fx.dir.path(), "a.ts", "let a = 1;");
        let b = write(fx.dir.path(), "b.ts", "let b = 2;");
        fx.session
            .register_file(&SourceUnit::new(&a, "a.ts", "os").with_package("alpha"))
            .unwrap();
        let kept = fx
            .session
            .register_file(&SourceUnit::new(&b, "b.ts", "os").with_package("beta"))
            .unwrap()
            .unwrap();
        assert_eq!(fx.session.pending(), &[kept]);
    }

    #[test]
    fn same_package_accumulates_in_order() {
        let mut fx = fixture(None);
        let b = write(fx.dir.path(), "b.ts", "let b = 2;\n");
        let a = write(fx.dir.path(), "a.ts", "let a = 1;\n");
        fx.session.register_file(&SourceUnit::new(&b, "b.ts", "os")).unwrap();
        fx.session.register_file(&SourceUnit::new(&a, "a.ts", "os")).unwrap();

        let out = fx
            .session
            .finalize(&"os".into(), &"app".into(), "app.js", &mut fx.cache, &fx.compiler)
            .unwrap();
        assert_eq!(out.file.unwrap().data, "let b = 2;\nlet a = 1;\n");
    }

    #[test]
    fn diagnostics_without_output() {
        let diag = Diagnostic::error(DiagnosticCode::compiler(2304), "Cannot find name 'b'.");
        let mut fx = fixture(Some(diag.clone()));
        let src = write(fx.dir.path(), "a.ts", "b();");
        fx.session.register_file(&SourceUnit::new(&src, "a.ts", "os")).unwrap();

        let out = fx
            .session
            .finalize(&"os".into(), &"app".into(), "app.js", &mut fx.cache, &fx.compiler)
            .unwrap();
        assert!(out.file.is_none());
        assert!(out.has_errors());
        assert_eq!(out.diagnostics, vec![diag]);
    }

    #[test]
    fn empty_unit_is_not_compiled() {
        let mut fx = fixture(None);
        let out = fx
            .session
            .finalize(&"os".into(), &"app".into(), "app.js", &mut fx.cache, &fx.compiler)
            .unwrap();
        assert!(out.file.is_none());
        assert!(fx.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn unchanged_rebuild_hits_cache() {
        let mut fx = fixture(None);
        let src = write(fx.dir.path(), "a.ts", SHARED);
        for _ in 0..2 {
            fx.session
                .register_file(&SourceUnit::new(&src, "a.ts", "web.browser"))
                .unwrap();
            fx.session
                .finalize(
                    &"web.browser".into(),
                    &"app".into(),
                    "app.js",
                    &mut fx.cache,
                    &fx.compiler,
                )
                .unwrap();
        }
        assert_eq!(fx.seen.lock().unwrap().len(), 1);
        assert_eq!(fx.cache.stats().hits, 1);
    }

    #[test]
    fn edited_source_recompiles() {
        let mut fx = fixture(None);
        let src = write(fx.dir.path(), "a.ts", "let a = 1;");
        let unit = SourceUnit::new(&src, "a.ts", "os");

        let scratch = fx.session.register_file(&unit).unwrap().unwrap();
        fx.session
            .finalize(&"os".into(), &"app".into(), "app.js", &mut fx.cache, &fx.compiler)
            .unwrap();

        std::fs::write(&src, "let a = 2;").unwrap();
        fx.session.register_file(&unit).unwrap();
        // Both writes may share one timestamp tick; pin the rewrite apart.
        std::fs::File::options()
            .write(true)
            .open(&scratch)
            .unwrap()
            .set_modified(std::time::SystemTime::UNIX_EPOCH)
            .unwrap();
        let out = fx
            .session
            .finalize(&"os".into(), &"app".into(), "app.js", &mut fx.cache, &fx.compiler)
            .unwrap();
        assert_eq!(fx.seen.lock().unwrap().len(), 2);
        assert_eq!(out.file.unwrap().data, "let a = 2;");
    }

    #[test]
    fn unreadable_source_is_fatal() {
        let mut fx = fixture(None);
        let missing = fx.dir.path().join("src/missing.ts");
        let err = fx
            .session
            .register_file(&SourceUnit::new(&missing, "missing.ts", "os"))
            .unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }

    #[test]
    fn unterminated_region_is_fatal() {
        let mut fx = fixture(None);
        let src = write(fx.dir.path(), "a.ts", "if (Meteor.isClient) { a();");
        let err = fx
            .session
            .register_file(&SourceUnit::new(&src, "a.ts", "os"))
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Elide(ElideError::UnterminatedRegion { .. })
        ));
    }
}
