//! Build architecture identifiers and their classification.
//!
//! An architecture id is an opaque dotted string such as `"os"`,
//! `"os.linux.x86_64"` or `"web.browser"`. Exactly one id is the server
//! architecture; every other id is a client. The same policy also picks the
//! language tier handed to the compiler.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The architecture id treated as the server when no policy is configured.
pub const DEFAULT_SERVER_ARCH: &str = "os";

/// A build target architecture id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Architecture(String);

impl Architecture {
    /// Creates an architecture from its id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Architecture {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Architecture {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Language-version tier selected for a compile.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LanguageTier {
    /// Conservative output that older runtimes accept (ES5).
    Standard,
    /// Newer output for the server runtime (ES2017).
    Elevated,
}

impl LanguageTier {
    /// Returns the compiler `--target` value for this tier.
    pub fn target_name(self) -> &'static str {
        match self {
            LanguageTier::Standard => "ES5",
            LanguageTier::Elevated => "ES2017",
        }
    }
}

impl fmt::Display for LanguageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageTier::Standard => write!(f, "standard"),
            LanguageTier::Elevated => write!(f, "elevated"),
        }
    }
}

/// Returns `true` if `arch` is `family` itself or a dotted sub-architecture of it.
///
/// `arch_matches("os.linux.x86_64", "os")` holds, `arch_matches("osx", "os")`
/// does not.
pub fn arch_matches(arch: &str, family: &str) -> bool {
    match arch.strip_prefix(family) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Classifies architecture ids. Both predicates are total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchPolicy {
    server: Architecture,
}

impl ArchPolicy {
    /// Creates a policy with the given server architecture id.
    pub fn new(server: impl Into<Architecture>) -> Self {
        Self {
            server: server.into(),
        }
    }

    /// The configured server architecture.
    pub fn server(&self) -> &Architecture {
        &self.server
    }

    /// Returns `true` only for the exact server id. Every other id is a client.
    pub fn is_server_class(&self, arch: &Architecture) -> bool {
        arch == &self.server
    }

    /// `Elevated` for the server id and its dotted sub-architectures,
    /// `Standard` for everything else.
    pub fn language_tier(&self, arch: &Architecture) -> LanguageTier {
        if arch_matches(arch.as_str(), self.server.as_str()) {
            LanguageTier::Elevated
        } else {
            LanguageTier::Standard
        }
    }
}

impl Default for ArchPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_ARCH)
    }
}
