//! Shared helpers for CLI commands: project root resolution, source
//! discovery, scanner and compiler construction.

use std::path::{Path, PathBuf};

use archprune_compile::{Compiler, TscCompiler};
use archprune_config::{ProjectConfig, ResolvedProject, CONFIG_FILE};
use archprune_elide::{ScanRules, Scanner};

use crate::GlobalArgs;

/// Extension of the files the build picks up.
const SOURCE_EXT: &str = "ts";

/// Walks up from `start` looking for the nearest directory containing `archprune.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file: its parent directory,
/// directory: itself), made absolute against the current directory.
/// Otherwise walks up from the current directory looking for `archprune.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        let dir = if p.is_file() {
            p.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            p
        };
        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir
        };
        Ok(std::path::absolute(dir)?)
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Discovers `.ts` files below `dir` (recursive), sorted by path.
///
/// Declaration files (`.d.ts`) are included; the compiler needs them.
pub fn discover_source_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXT) {
            files.push(path);
        }
    }
    Ok(())
}

/// The logical path of `file`: relative to `source_dir` when below it.
pub fn logical_path_of(file: &Path, source_dir: &Path) -> PathBuf {
    file.strip_prefix(source_dir)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| file.to_path_buf())
}

/// A scanner configured from the `[scan]` section.
pub fn scanner_for(config: &ProjectConfig, project: &ResolvedProject) -> Scanner {
    Scanner::new(ScanRules::from_config(&config.scan, project.policy.clone()))
}

/// The external compiler configured from the `[compiler]` section.
pub fn compiler_for(config: &ProjectConfig, project: &ResolvedProject) -> Compiler {
    let tsc = TscCompiler::new(config.compiler.program.as_str())
        .with_extra_args(config.compiler.extra_args.clone());
    Compiler::new(Box::new(tsc), project.policy.clone())
        .with_out_file(config.compiler.out_file.as_str())
}
