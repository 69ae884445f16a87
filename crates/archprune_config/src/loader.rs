//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "archprune.toml";

/// Loads and validates an `archprune.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `archprune.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are consistent.
///
/// A prologue must end with `{`: the scanner counts the region's own opening
/// brace as already seen when the prologue matches.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    for (field, prologue) in [
        ("scan.client_prologue", &config.scan.client_prologue),
        ("scan.server_prologue", &config.scan.server_prologue),
    ] {
        if prologue.is_empty() {
            return Err(ConfigError::MissingField(field.to_string()));
        }
        if !prologue.ends_with('{') {
            return Err(ConfigError::ValidationError(format!(
                "{field} must end with '{{', got {prologue:?}"
            )));
        }
    }
    if config.scan.client_prologue == config.scan.server_prologue {
        return Err(ConfigError::ValidationError(
            "client and server prologues must differ".to_string(),
        ));
    }
    if config.arch.server.is_empty() {
        return Err(ConfigError::MissingField("arch.server".to_string()));
    }
    if config.arch.targets.iter().any(|t| t.is_empty()) {
        return Err(ConfigError::ValidationError(
            "arch.targets must not contain empty ids".to_string(),
        ));
    }
    if config.scratch.root.is_empty() {
        return Err(ConfigError::MissingField("scratch.root".to_string()));
    }
    if config.compiler.program.is_empty() {
        return Err(ConfigError::MissingField("compiler.program".to_string()));
    }
    Ok(())
}
