//! Parsing and validation of `archprune.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`] covering the conditional-region prologues, architecture
//! policy, scratch layout, and compiler invocation, plus [`ResolvedProject`]
//! with every directory made absolute.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_project, ResolvedProject};
pub use types::*;
