//! `archprune build`: prune and compile the project per architecture.
//!
//! 1. Find project root (walk up looking for `archprune.toml`)
//! 2. Load config and resolve directories
//! 3. Discover `.ts` files below `source_dir`
//! 4. For each target architecture: register every file with the session,
//!    finalize through the compile cache, write `<output_dir>/<arch>/<name>.js`
//!    and its source map
//! 5. Render diagnostics
//!
//! An unterminated region is reported as an `S001` diagnostic and the
//! affected architecture is not compiled.

use std::path::{Path, PathBuf};

use archprune_build::{BuildError, BuildSession, OutputFile, ScratchLayout};
use archprune_cache::CompileCache;
use archprune_common::Architecture;
use archprune_compile::Compiler;
use archprune_config::{resolve_project, ProjectConfig, ResolvedProject};
use archprune_diagnostics::{
    Category, Diagnostic, DiagnosticCode, DiagnosticRenderer, DiagnosticSink, TerminalRenderer,
};
use archprune_elide::ElideError;
use archprune_source::{LogicalPath, ResolvedLocation, SourceDb, SourceUnit};
use tracing::{debug, warn};

use crate::pipeline::{
    compiler_for, discover_source_files, logical_path_of, resolve_project_root, scanner_for,
};
use crate::{BuildArgs, GlobalArgs, ReportFormat};

/// Runs the `archprune build` command.
///
/// Returns exit code 0 if no errors, 1 if any error diagnostic was reported.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = archprune_config::load_config(&project_dir)?;
    let project = resolve_project(&config, &project_dir);
    let compiler = compiler_for(&config, &project);
    build_project(&config, &project, &compiler, args, global)
}

/// Builds every requested architecture with `compiler`.
pub(crate) fn build_project(
    config: &ProjectConfig,
    project: &ResolvedProject,
    compiler: &Compiler,
    args: &BuildArgs,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let targets: Vec<Architecture> = if args.arch.is_empty() {
        project.targets.clone()
    } else {
        args.arch.iter().map(|a| Architecture::new(a.as_str())).collect()
    };

    let sources = if project.source_dir.is_dir() {
        discover_source_files(&project.source_dir)?
    } else {
        Vec::new()
    };
    if sources.is_empty() {
        if !global.quiet {
            eprintln!(
                "warning: no TypeScript sources found in {}",
                project.source_dir.display()
            );
        }
        return Ok(0);
    }

    let mut session = BuildSession::new(
        scanner_for(config, project),
        ScratchLayout::new(&project.scratch_root),
    );
    let mut cache = CompileCache::new();
    let sink = DiagnosticSink::new();
    let bundle = LogicalPath::from(project.name.as_str());
    let output_name = project.output_name();

    for arch in &targets {
        if !global.quiet {
            eprintln!("   Pruning {} file(s) for {arch}", sources.len());
        }
        let mut scan_failed = false;
        for path in &sources {
            let logical = logical_path_of(path, &project.source_dir);
            match session.register_file(&SourceUnit::new(path, logical, arch.clone())) {
                Ok(_) => {}
                Err(BuildError::Elide(err)) => {
                    sink.emit(scan_diagnostic(&err, path));
                    scan_failed = true;
                }
                Err(e) => return Err(e.into()),
            }
        }
        if scan_failed {
            warn!(arch = %arch, "scan failed, architecture skipped");
            session.reset();
            continue;
        }

        if !global.quiet {
            eprintln!(
                "  Compiling {output_name} ({arch}, {})",
                compiler.policy().language_tier(arch).target_name()
            );
        }
        let output = session.finalize(arch, &bundle, &output_name, &mut cache, compiler)?;
        sink.extend(output.diagnostics);

        if let Some(file) = &output.file {
            let written = write_output(&project.output_dir, arch, file)?;
            debug!(path = %written.display(), "output written");
        }
    }

    let diagnostics = sink.diagnostics();
    report(&diagnostics, args.format, global);

    let stats = cache.stats();
    debug!(hits = stats.hits, misses = stats.misses, "compile cache");

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Finished {} architecture(s): {} error(s), {} warning(s)",
            targets.len(),
            sink.error_count(),
            sink.warning_count()
        );
    }

    Ok(if sink.has_errors() { 1 } else { 0 })
}

/// Converts a scanner failure into an `S001` diagnostic at the region's
/// prologue in `full_path`.
fn scan_diagnostic(err: &ElideError, full_path: &Path) -> Diagnostic {
    match err {
        ElideError::UnterminatedRegion { line, .. } => Diagnostic::error(
            DiagnosticCode::new(Category::Scan, 1),
            err.to_string(),
        )
        .with_location(ResolvedLocation::new(
            full_path,
            u32::try_from(*line).unwrap_or(u32::MAX),
            1,
        ))
        .with_note("set `scan.unterminated = \"emit-partial\"` to keep partial output"),
    }
}

/// Writes `<output_dir>/<arch>/<path>` and, when present, its `.map`.
fn write_output(
    output_dir: &Path,
    arch: &Architecture,
    file: &OutputFile,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let js = output_dir.join(arch.as_str()).join(&file.path);
    if let Some(parent) = js.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&js, &file.data)?;
    if !file.source_map.is_empty() {
        let mut map = js.clone().into_os_string();
        map.push(".map");
        std::fs::write(PathBuf::from(map), &file.source_map)?;
    }
    Ok(js)
}

/// Prints diagnostics in the requested format.
fn report(diagnostics: &[Diagnostic], format: ReportFormat, global: &GlobalArgs) {
    match format {
        ReportFormat::Text => {
            let diagnostics = shown_in_text(diagnostics, global);
            let mut source_db = SourceDb::new();
            for diag in &diagnostics {
                if let Some(loc) = &diag.location {
                    if source_db.get_file(&loc.file_path).is_none() {
                        let _ = source_db.load_file(&loc.file_path);
                    }
                }
            }
            let renderer = TerminalRenderer::new(global.color);
            for diag in diagnostics {
                eprintln!("{}", renderer.render(diag, &source_db));
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Diagnostics rendered in text mode: errors only under `--quiet`.
fn shown_in_text<'a>(diagnostics: &'a [Diagnostic], global: &GlobalArgs) -> Vec<&'a Diagnostic> {
    diagnostics
        .iter()
        .filter(|d| !global.quiet || d.severity.is_error())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use archprune_compile::{CompileError, CompileOptions, CompilerAdapter, RawEmit};
    use archprune_diagnostics::DiagnosticCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Bundles the pruned copies verbatim; optionally reports one error.
    ///
    /// Like `tsc` running in its own working directory, it cannot find
    /// inputs given by relative path.
    struct Bundler {
        calls: Arc<AtomicUsize>,
        error: bool,
    }

    impl CompilerAdapter for Bundler {
        fn compile(&self, files: &[PathBuf], options: &CompileOptions) -> Result<RawEmit, CompileError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.error {
                return Ok(RawEmit::skipped(vec![Diagnostic::error(
                    DiagnosticCode::compiler(2304),
                    "Cannot find name 'b'.",
                )]));
            }
            if let Some(rel) = files.iter().find(|f| f.is_relative()) {
                return Ok(RawEmit::skipped(vec![Diagnostic::error(
                    DiagnosticCode::compiler(6053),
                    format!("File '{}' not found.", rel.display()),
                )]));
            }
            let mut code = format!("// {}\n", options.tier.target_name());
            for f in files {
                code.push_str(&std::fs::read_to_string(f).map_err(|e| CompileError::Io {
                    path: f.clone(),
                    source: e,
                })?);
            }
            Ok(RawEmit {
                emitted: Some(code),
                ..RawEmit::default()
            })
        }
    }

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        }
    }

    fn project(tmp: &TempDir) -> (ProjectConfig, ResolvedProject) {
        project_at(tmp.path())
    }

    fn project_at(root: &Path) -> (ProjectConfig, ResolvedProject) {
        let config = archprune_config::load_config_from_str(
            "[project]\nname = \"todos\"\n\n[scratch]\nroot = \"scratch\"\n",
        )
        .unwrap();
        let resolved = resolve_project(&config, root);
        std::fs::create_dir_all(root.join("src/server")).unwrap();
        std::fs::write(
            root.join("src/main.ts"),
            "a();\nif (Meteor.isServer) { b(); }\nc();",
        )
        .unwrap();
        std::fs::write(root.join("src/server/db.ts"), "if (Meteor.isClient) { x(); }\n").unwrap();
        (config, resolved)
    }

    fn compiler(error: bool) -> (Compiler, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let adapter = Bundler {
            calls: Arc::clone(&calls),
            error,
        };
        (
            Compiler::new(Box::new(adapter), archprune_common::ArchPolicy::default()),
            calls,
        )
    }

    fn args(arch: &[&str]) -> BuildArgs {
        BuildArgs {
            arch: arch.iter().map(|a| a.to_string()).collect(),
            format: ReportFormat::Json,
        }
    }

    #[test]
    fn builds_every_target_architecture() {
        let tmp = TempDir::new().unwrap();
        let (config, resolved) = project(&tmp);
        let (compiler, calls) = compiler(false);

        let code = build_project(&config, &resolved, &compiler, &args(&[]), &quiet()).unwrap();
        assert_eq!(code, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let server = std::fs::read_to_string(tmp.path().join("dist/os/todos.js")).unwrap();
        let client = std::fs::read_to_string(tmp.path().join("dist/web.browser/todos.js")).unwrap();
        assert!(server.starts_with("// ES2017\n"));
        assert!(server.contains("a();\n b(); \nc();"));
        assert!(client.starts_with("// ES5\n"));
        assert!(client.contains("a();\n\nc();"));
        // environment roots bypass the scanner
        assert!(client.contains("if (Meteor.isClient) { x(); }"));
        assert!(tmp.path().join("scratch/web.browser").is_dir());
    }

    #[test]
    fn relative_project_root_compiles_absolute_inputs() {
        let tmp = tempfile::tempdir_in(".").unwrap();
        let relative = Path::new(".").join(tmp.path().file_name().unwrap());
        let (config, resolved) = project_at(&relative);
        assert!(resolved.scratch_root.is_absolute());
        let (compiler, calls) = compiler(false);

        let code = build_project(&config, &resolved, &compiler, &args(&["os"]), &quiet()).unwrap();
        assert_eq!(code, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(relative.join("dist/os/todos.js").is_file());
    }

    #[test]
    fn arch_flag_narrows_targets() {
        let tmp = TempDir::new().unwrap();
        let (config, resolved) = project(&tmp);
        let (compiler, calls) = compiler(false);

        build_project(&config, &resolved, &compiler, &args(&["web.browser"]), &quiet()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!tmp.path().join("dist/os").exists());
    }

    #[test]
    fn error_diagnostics_set_exit_code() {
        let tmp = TempDir::new().unwrap();
        let (config, resolved) = project(&tmp);
        let (compiler, _) = compiler(true);

        let code = build_project(&config, &resolved, &compiler, &args(&["os"]), &quiet()).unwrap();
        assert_eq!(code, 1);
        assert!(!tmp.path().join("dist/os/todos.js").exists());
    }

    #[test]
    fn unterminated_region_is_reported_and_skips_compile() {
        let tmp = TempDir::new().unwrap();
        let (config, resolved) = project(&tmp);
        std::fs::write(
            tmp.path().join("src/broken.ts"),
            "x();\nif (Meteor.isServer) {\n  y();\n",
        )
        .unwrap();
        let (compiler, calls) = compiler(false);

        let code = build_project(&config, &resolved, &compiler, &args(&[]), &quiet()).unwrap();
        assert_eq!(code, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!tmp.path().join("dist/web.browser/todos.js").exists());
        assert!(!tmp.path().join("dist/os/todos.js").exists());
    }

    #[test]
    fn scan_diagnostic_points_at_prologue() {
        let err = ElideError::UnterminatedRegion {
            path: PathBuf::from("broken.ts"),
            line: 2,
            kind: archprune_elide::RegionKind::Server,
            arch: Architecture::new("web.browser"),
        };
        let diag = scan_diagnostic(&err, Path::new("/app/src/broken.ts"));
        assert_eq!(format!("{}", diag.code), "S001");
        let loc = diag.location.unwrap();
        assert_eq!(loc.file_path, PathBuf::from("/app/src/broken.ts"));
        assert_eq!(loc.line, 2);
        assert!(diag.notes[0].contains("emit-partial"));
    }

    #[test]
    fn quiet_text_report_keeps_only_errors() {
        let diagnostics = vec![
            Diagnostic::warning(DiagnosticCode::compiler(6133), "'y' is declared but never read."),
            Diagnostic::error(DiagnosticCode::compiler(2304), "Cannot find name 'b'."),
        ];
        let shown = shown_in_text(&diagnostics, &quiet());
        assert_eq!(shown.len(), 1);
        assert!(shown[0].severity.is_error());

        let loud = GlobalArgs {
            quiet: false,
            ..quiet()
        };
        assert_eq!(shown_in_text(&diagnostics, &loud).len(), 2);
    }

    #[test]
    fn empty_source_dir_is_a_warning() {
        let tmp = TempDir::new().unwrap();
        let config = archprune_config::load_config_from_str("[project]\nname = \"empty\"\n").unwrap();
        let resolved = resolve_project(&config, tmp.path());
        let (compiler, calls) = compiler(false);

        let code = build_project(&config, &resolved, &compiler, &args(&[]), &quiet()).unwrap();
        assert_eq!(code, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn source_map_written_next_to_output() {
        let tmp = TempDir::new().unwrap();
        let file = OutputFile {
            path: PathBuf::from("todos.js"),
            source_path: PathBuf::from("todos"),
            data: "var a;".to_string(),
            source_map: "{\"version\":3}".to_string(),
        };
        let js = write_output(tmp.path(), &Architecture::new("os"), &file).unwrap();
        assert_eq!(js, tmp.path().join("os/todos.js"));
        assert!(tmp.path().join("os/todos.js.map").is_file());
    }
}
