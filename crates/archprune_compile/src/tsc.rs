//! Adapter running the TypeScript command-line compiler.
//!
//! The compiler writes its bundle into a private temporary directory; its
//! `--pretty false` report is parsed into diagnostics, one per
//! `file(line,col): category TSnnnn: message` line, with indented
//! continuation lines folded into the preceding message.

use std::path::{Path, PathBuf};
use std::process::Command;

use archprune_diagnostics::{Diagnostic, DiagnosticCode, Severity};
use archprune_source::ResolvedLocation;
use tracing::{debug, warn};

use crate::adapter::{read_to_string, CompilerAdapter, RawEmit};
use crate::error::CompileError;
use crate::options::CompileOptions;

/// Runs `tsc` (or a compatible program) as an external process.
#[derive(Debug, Clone)]
pub struct TscCompiler {
    program: String,
    extra_args: Vec<String>,
}

impl TscCompiler {
    /// Creates an adapter for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Appends arguments after the fixed option set.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
}

impl Default for TscCompiler {
    fn default() -> Self {
        Self::new("tsc")
    }
}

impl CompilerAdapter for TscCompiler {
    fn compile(&self, files: &[PathBuf], options: &CompileOptions) -> Result<RawEmit, CompileError> {
        let work = tempfile::tempdir().map_err(|e| CompileError::Io {
            path: std::env::temp_dir(),
            source: e,
        })?;

        let output = Command::new(&self.program)
            .args(options.to_args())
            .args(&self.extra_args)
            .args(files)
            .current_dir(work.path())
            .output()
            .map_err(|e| CompileError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostics = parse_report(&stdout);
        debug!(
            status = %output.status,
            diagnostics = diagnostics.len(),
            "compiler finished"
        );

        let out_path = work.path().join(&options.out_file);
        if !out_path.is_file() {
            if !output.status.success() && diagnostics.is_empty() {
                return Err(CompileError::Failed {
                    program: self.program.clone(),
                    status: output.status.to_string(),
                    stderr: stderr.trim().to_string(),
                });
            }
            return Ok(RawEmit::skipped(diagnostics));
        }

        let emitted = read_to_string(&out_path)?;
        let map_path = work.path().join(options.map_file());
        let source_map = if map_path.is_file() {
            Some(read_to_string(&map_path)?)
        } else {
            warn!(path = %map_path.display(), "compiler emitted no source map");
            None
        };

        Ok(RawEmit {
            emitted: Some(emitted),
            source_map,
            diagnostics,
            source_base: work.path().to_path_buf(),
        })
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Parses a `--pretty false` compiler report into diagnostics.
pub fn parse_report(report: &str) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    for line in report.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            if let Some(last) = diagnostics.last_mut() {
                last.message.push('\n');
                last.message.push_str(line.trim());
                continue;
            }
        }
        if let Some(diag) = parse_line(line) {
            diagnostics.push(diag);
        }
    }
    diagnostics
}

/// Parses one report line, located or not.
fn parse_line(line: &str) -> Option<Diagnostic> {
    if let Some((location, rest)) = split_location(line) {
        return parse_body(rest).map(|d| d.with_location(location));
    }
    parse_body(line)
}

/// Splits `path(line,col): rest` into its location and `rest`.
fn split_location(line: &str) -> Option<(ResolvedLocation, &str)> {
    let close = line.find("): ")?;
    let head = &line[..close];
    let open = head.rfind('(')?;
    let (row, col) = head[open + 1..].split_once(',')?;
    let location = ResolvedLocation::new(
        Path::new(&head[..open]),
        row.trim().parse().ok()?,
        col.trim().parse().ok()?,
    );
    Some((location, &line[close + 3..]))
}

/// Parses `category TSnnnn: message`.
fn parse_body(body: &str) -> Option<Diagnostic> {
    let (category, rest) = body.split_once(' ')?;
    let (code, message) = rest.split_once(": ")?;
    let number = code.strip_prefix("TS")?.parse().ok()?;
    Some(Diagnostic::new(
        Severity::from_compiler_category(category),
        DiagnosticCode::compiler(number),
        message,
    ))
}
