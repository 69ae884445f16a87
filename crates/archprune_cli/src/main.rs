//! Command-line front end that prunes architecture-conditional regions before the TypeScript compiler runs.
//!
//! Provides `archprune init` for project scaffolding, `archprune prune` for
//! running the scanner over a single file, and `archprune build` for pruning
//! and compiling a whole project for every target architecture.

#![warn(missing_docs)]

mod build;
mod init;
mod logging;
mod pipeline;
mod prune;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// archprune: one source tree, one bundle per architecture.
#[derive(Parser, Debug)]
#[command(name = "archprune", version, about = "Architecture-conditional TypeScript pruning")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `archprune.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project.
    Init {
        /// Project name (creates a subdirectory). If omitted, initializes in
        /// the current directory.
        name: Option<String>,
    },
    /// Prune one file for one architecture and print the result.
    Prune(PruneArgs),
    /// Prune and compile the project for its target architectures.
    Build(BuildArgs),
}

/// Arguments for the `archprune prune` subcommand.
#[derive(Parser, Debug)]
pub struct PruneArgs {
    /// Source file to prune.
    pub file: String,

    /// Architecture to prune for (e.g. `os`, `web.browser`).
    #[arg(short, long)]
    pub arch: String,

    /// Logical path used for environment-root detection (default: FILE).
    #[arg(long)]
    pub logical_path: Option<String>,

    /// Write the result here instead of standard output.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the `archprune build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Architectures to build (default: `arch.targets` from the config).
    #[arg(short, long)]
    pub arch: Vec<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    logging::init(&global);

    let result = match cli.command {
        Command::Init { name } => init::run(name),
        Command::Prune(ref args) => prune::run(args, &global),
        Command::Build(ref args) => build::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
