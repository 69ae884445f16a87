//! `archprune prune`: run the scanner over a single file.
//!
//! Uses the project's `[scan]` and `[arch]` settings when an
//! `archprune.toml` is found, the built-in defaults otherwise.

use std::path::{Path, PathBuf};

use archprune_common::Architecture;
use archprune_config::resolve_project;
use archprune_elide::Scanner;
use archprune_source::LogicalPath;
use tracing::debug;

use crate::pipeline::{find_project_root, resolve_project_root, scanner_for};
use crate::{GlobalArgs, PruneArgs};

/// Runs the `archprune prune` command.
pub fn run(args: &PruneArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let file = PathBuf::from(&args.file);
    let source = std::fs::read_to_string(&file)
        .map_err(|e| format!("cannot read {}: {e}", file.display()))?;

    let scanner = load_scanner(global)?;
    let logical = LogicalPath::new(args.logical_path.as_deref().unwrap_or(args.file.as_str()));
    let arch = Architecture::new(args.arch.as_str());

    if !global.quiet {
        eprintln!(
            "   Pruning {} for {arch} ({})",
            file.display(),
            if scanner.rules().policy.is_server_class(&arch) {
                "server"
            } else {
                "client"
            }
        );
    }

    let pruned = scanner.process(&source, &logical, &arch)?;

    match &args.output {
        Some(out) => {
            let out = Path::new(out);
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, pruned)?;
            if !global.quiet {
                eprintln!("     Wrote {}", out.display());
            }
        }
        None => print!("{pruned}"),
    }

    Ok(0)
}

/// The project scanner, or the default one when there is no project.
///
/// An explicit `--config` that cannot be loaded is an error.
fn load_scanner(global: &GlobalArgs) -> Result<Scanner, Box<dyn std::error::Error>> {
    let root = if global.config.is_some() {
        resolve_project_root(global)?
    } else {
        match find_project_root(&std::env::current_dir()?) {
            Ok(root) => root,
            Err(e) => {
                debug!("{e}, using default scan rules");
                return Ok(Scanner::default());
            }
        }
    };
    let config = archprune_config::load_config(&root)?;
    let project = resolve_project(&config, &root);
    Ok(scanner_for(&config, &project))
}
