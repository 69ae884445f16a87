//! Scaffolding for `archprune init`.
//!
//! Creates a project directory with `src/`, `src/client/`, `src/server/`,
//! an `archprune.toml` and a starter module showing both region kinds.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use archprune_config::CONFIG_FILE;

/// Runs the `archprune init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory.
pub fn run(name: Option<String>) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("directory '{n}' already exists").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        return Err(format!("{CONFIG_FILE} already exists in {}", project_dir.display()).into());
    }

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("app");

    eprintln!("  Creating new project `{project_name}`");
    scaffold(&project_dir, project_name)?;
    eprintln!("     Created {}", project_dir.join(CONFIG_FILE).display());
    eprintln!("     Created {}", project_dir.join("src").join("main.ts").display());

    Ok(0)
}

/// Writes the config, source directories and starter module.
fn scaffold(root: &Path, name: &str) -> io::Result<()> {
    for dir in ["src/client", "src/server"] {
        fs::create_dir_all(root.join(dir))?;
    }
    fs::write(root.join(CONFIG_FILE), config_template(name))?;
    fs::write(root.join("src").join("main.ts"), MAIN_TEMPLATE)?;
    Ok(())
}

fn config_template(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
source_dir = "src"
output_dir = "dist"

[scan]
client_prologue = "if (Meteor.isClient) {{"
server_prologue = "if (Meteor.isServer) {{"
environment_roots = ["client", "server"]

[arch]
server = "os"
targets = ["os", "web.browser"]

[compiler]
program = "tsc"
"#
    )
}

const MAIN_TEMPLATE: &str = r#"declare const Meteor: { isClient: boolean; isServer: boolean };

export function greet(name: string): string {
    return "hello, " + name;
}

if (Meteor.isClient) {
    console.log(greet("browser"));
}

if (Meteor.isServer) {
    console.log(greet("server"));
}
"#;
