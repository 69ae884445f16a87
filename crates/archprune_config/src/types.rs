//! Configuration types deserialized from `archprune.toml`.

use archprune_common::DEFAULT_SERVER_ARCH;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// Default prologue opening a client-only region.
pub const DEFAULT_CLIENT_PROLOGUE: &str = "if (Meteor.isClient) {";

/// Default prologue opening a server-only region.
pub const DEFAULT_SERVER_PROLOGUE: &str = "if (Meteor.isServer) {";

/// The top-level project configuration parsed from `archprune.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Conditional-region recognition.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Architecture policy and build targets.
    #[serde(default)]
    pub arch: ArchConfig,
    /// Where pruned per-architecture copies are written.
    #[serde(default)]
    pub scratch: ScratchConfig,
    /// External compiler invocation.
    #[serde(default)]
    pub compiler: CompilerConfig,
}

/// Core project metadata required in every `archprune.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name; also names the emitted bundle (`<name>.js`).
    pub name: String,
    /// Directory holding the sources, relative to the project root.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    /// Directory receiving emitted code, relative to the project root.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_source_dir() -> String {
    "src".to_string()
}

fn default_output_dir() -> String {
    "dist".to_string()
}

/// How the scanner recognizes and treats conditional regions.
#[derive(Debug, Deserialize)]
pub struct ScanConfig {
    /// Literal that opens a client-only region, including its `{`.
    #[serde(default = "default_client_prologue")]
    pub client_prologue: String,
    /// Literal that opens a server-only region, including its `{`.
    #[serde(default = "default_server_prologue")]
    pub server_prologue: String,
    /// First path segments that pin a file to one environment; such files
    /// are passed through unscanned.
    #[serde(
        default = "default_environment_roots",
        deserialize_with = "deserialize_string_or_vec"
    )]
    pub environment_roots: Vec<String>,
    /// Treat quoted string and template literals as opaque inside regions.
    #[serde(default)]
    pub string_literals: bool,
    /// What to do when input ends inside a region.
    #[serde(default)]
    pub unterminated: UnterminatedMode,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            client_prologue: default_client_prologue(),
            server_prologue: default_server_prologue(),
            environment_roots: default_environment_roots(),
            string_literals: false,
            unterminated: UnterminatedMode::default(),
        }
    }
}

fn default_client_prologue() -> String {
    DEFAULT_CLIENT_PROLOGUE.to_string()
}

fn default_server_prologue() -> String {
    DEFAULT_SERVER_PROLOGUE.to_string()
}

fn default_environment_roots() -> Vec<String> {
    vec!["client".to_string(), "server".to_string()]
}

/// Handling of a conditional region still open at end of input.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UnterminatedMode {
    /// Fail the file (default).
    #[default]
    Error,
    /// Return whatever output was produced up to end of input.
    EmitPartial,
}

/// Architecture policy and the targets a project build produces.
#[derive(Debug, Deserialize)]
pub struct ArchConfig {
    /// The single server-class architecture id.
    #[serde(default = "default_server_arch")]
    pub server: String,
    /// Architectures built by `archprune build` when none are given.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(
        default = "default_targets",
        deserialize_with = "deserialize_string_or_vec"
    )]
    pub targets: Vec<String>,
}

impl Default for ArchConfig {
    fn default() -> Self {
        Self {
            server: default_server_arch(),
            targets: default_targets(),
        }
    }
}

fn default_server_arch() -> String {
    DEFAULT_SERVER_ARCH.to_string()
}

fn default_targets() -> Vec<String> {
    vec![DEFAULT_SERVER_ARCH.to_string(), "web.browser".to_string()]
}

/// Scratch storage for pruned copies.
#[derive(Debug, Deserialize)]
pub struct ScratchConfig {
    /// Root directory, relative to the project root.
    #[serde(default = "default_scratch_root")]
    pub root: String,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            root: default_scratch_root(),
        }
    }
}

fn default_scratch_root() -> String {
    "packages/_temp".to_string()
}

/// External compiler settings.
#[derive(Debug, Deserialize)]
pub struct CompilerConfig {
    /// Program to run (looked up on `PATH` when not a path).
    #[serde(default = "default_program")]
    pub program: String,
    /// Name of the single bundled output file the compiler writes.
    #[serde(default = "default_out_file")]
    pub out_file: String,
    /// Extra arguments appended after the fixed option set.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            out_file: default_out_file(),
            extra_args: Vec::new(),
        }
    }
}

fn default_program() -> String {
    "tsc".to_string()
}

fn default_out_file() -> String {
    "out.js".to_string()
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows TOML config to accept both `targets = "os"` (string) and
/// `targets = ["os", "web.browser"]` (array of strings).
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
