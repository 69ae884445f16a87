//! What the scanner recognizes and how it treats edge cases.

use archprune_common::ArchPolicy;
use archprune_config::{ScanConfig, UnterminatedMode, DEFAULT_CLIENT_PROLOGUE, DEFAULT_SERVER_PROLOGUE};

/// Recognition rules for one [`Scanner`](crate::Scanner).
#[derive(Debug, Clone)]
pub struct ScanRules {
    /// Literal opening a client-only region, ending in its `{`.
    pub client_prologue: String,
    /// Literal opening a server-only region, ending in its `{`.
    pub server_prologue: String,
    /// First path segments whose files bypass scanning.
    pub environment_roots: Vec<String>,
    /// Treat `'…'`, `"…"` and `` `…` `` as opaque inside regions.
    ///
    /// Off, a brace or comment opener inside a string literal in a region is
    /// counted like code and can end the region early.
    pub string_literals: bool,
    /// Handling of input that ends inside a region.
    pub unterminated: UnterminatedMode,
    /// Decides which architecture keeps server regions.
    pub policy: ArchPolicy,
}

impl ScanRules {
    /// Builds rules from the `[scan]` configuration section.
    pub fn from_config(scan: &ScanConfig, policy: ArchPolicy) -> Self {
        Self {
            client_prologue: scan.client_prologue.clone(),
            server_prologue: scan.server_prologue.clone(),
            environment_roots: scan.environment_roots.clone(),
            string_literals: scan.string_literals,
            unterminated: scan.unterminated,
            policy,
        }
    }

    /// Replaces both prologues.
    pub fn with_prologues(mut self, client: impl Into<String>, server: impl Into<String>) -> Self {
        self.client_prologue = client.into();
        self.server_prologue = server.into();
        self
    }

    /// Enables or disables string-literal awareness.
    pub fn with_string_literals(mut self, enabled: bool) -> Self {
        self.string_literals = enabled;
        self
    }

    /// Sets the unterminated-region policy.
    pub fn with_unterminated(mut self, mode: UnterminatedMode) -> Self {
        self.unterminated = mode;
        self
    }

    /// Sets the architecture policy.
    pub fn with_policy(mut self, policy: ArchPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for ScanRules {
    fn default() -> Self {
        Self {
            client_prologue: DEFAULT_CLIENT_PROLOGUE.to_string(),
            server_prologue: DEFAULT_SERVER_PROLOGUE.to_string(),
            environment_roots: vec!["client".to_string(), "server".to_string()],
            string_literals: false,
            unterminated: UnterminatedMode::Error,
            policy: ArchPolicy::default(),
        }
    }
}
