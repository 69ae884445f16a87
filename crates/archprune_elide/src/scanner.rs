//! The conditional-region scanner.
//!
//! One left-to-right pass, one character at a time. Every character is
//! pushed to both the suffix buffer and the output first; the state machine
//! then decides whether to take it (or a just-completed prologue) back out.
//!
//! Inside a region the scanner tracks brace depth and a lexical sub-state so
//! that braces in comments do not close the region. Characters of a region
//! that does not match the target architecture are erased one by one, which
//! keeps the nesting bookkeeping identical for kept and dropped regions.

use std::fmt;

use archprune_common::Architecture;
use archprune_config::UnterminatedMode;
use archprune_source::LogicalPath;
use tracing::{debug, trace, warn};

use crate::error::ElideError;
use crate::output::OutputBuffer;
use crate::rules::ScanRules;
use crate::suffix::SuffixMatchBuffer;

const OPEN_BRACE: &str = "{";
const CLOSE_BRACE: &str = "}";
const LINE_COMMENT_OPEN: &str = "//";
const LINE_COMMENT_CLOSE: [&str; 2] = ["\r", "\n"];
const BLOCK_COMMENT_OPEN: &str = "/*";
const BLOCK_COMMENT_CLOSE: &str = "*/";

/// Which conditional region, if any, the scanner is inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Outside every region.
    Neutral,
    /// Inside a client-only region.
    InClientBlock,
    /// Inside a server-only region.
    InServerBlock,
}

impl ScanState {
    fn region(self) -> Option<RegionKind> {
        match self {
            ScanState::Neutral => None,
            ScanState::InClientBlock => Some(RegionKind::Client),
            ScanState::InServerBlock => Some(RegionKind::Server),
        }
    }
}

/// Lexical context inside a region. Always `Code` while `Neutral`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubState {
    /// Ordinary code: braces count.
    Code,
    /// After `//`, until a line terminator.
    LineComment,
    /// After `/*`, until `*/`.
    BlockComment,
    /// Inside a quoted literal (only with string-literal awareness on).
    StringLiteral {
        /// The opening quote character.
        quote: char,
        /// The previous character was an unconsumed backslash.
        escaped: bool,
    },
}

/// The two kinds of conditional region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionKind {
    /// Runs only on client architectures.
    Client,
    /// Runs only on the server architecture.
    Server,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionKind::Client => write!(f, "client-only"),
            RegionKind::Server => write!(f, "server-only"),
        }
    }
}

/// Prunes source text for one target architecture.
///
/// The scanner holds only its rules; every call to [`process`](Self::process)
/// starts from `Neutral` with fresh buffers.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    rules: ScanRules,
}

impl Scanner {
    /// Creates a scanner with the given rules.
    pub fn new(rules: ScanRules) -> Self {
        Self { rules }
    }

    /// The rules in effect.
    pub fn rules(&self) -> &ScanRules {
        &self.rules
    }

    /// Returns `source` with every region either unwrapped (prologue and
    /// closing brace stripped, body kept) or removed entirely, depending on
    /// whether it matches `arch`.
    ///
    /// Files whose logical path starts with an environment root are
    /// returned unchanged.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %logical_path, arch = %arch))]
    pub fn process(
        &self,
        source: &str,
        logical_path: &LogicalPath,
        arch: &Architecture,
    ) -> Result<String, ElideError> {
        if logical_path.is_under_any(&self.rules.environment_roots) {
            debug!("environment root, scan bypassed");
            return Ok(source.to_string());
        }

        let desired = if self.rules.policy.is_server_class(arch) {
            ScanState::InServerBlock
        } else {
            ScanState::InClientBlock
        };

        let mut pass = Pass::new(&self.rules, desired, source.len());
        for c in source.chars() {
            pass.step(c);
        }

        debug!(kept = pass.kept, dropped = pass.dropped, "scan finished");

        if let Some(kind) = pass.state.region() {
            match self.rules.unterminated {
                UnterminatedMode::Error => {
                    return Err(ElideError::UnterminatedRegion {
                        path: logical_path.as_path().to_path_buf(),
                        line: pass.region_line,
                        kind,
                        arch: arch.clone(),
                    });
                }
                UnterminatedMode::EmitPartial => {
                    warn!(
                        line = pass.region_line,
                        %kind,
                        "input ended inside a region, emitting partial output"
                    );
                }
            }
        }

        Ok(pass.output.finish())
    }
}

/// State of a single scan.
struct Pass<'r> {
    rules: &'r ScanRules,
    desired: ScanState,
    client_len: usize,
    server_len: usize,
    suffix: SuffixMatchBuffer,
    output: OutputBuffer,
    state: ScanState,
    sub: SubState,
    depth: usize,
    line: usize,
    region_line: usize,
    kept: usize,
    dropped: usize,
}

impl<'r> Pass<'r> {
    fn new(rules: &'r ScanRules, desired: ScanState, capacity: usize) -> Self {
        Self {
            rules,
            desired,
            client_len: rules.client_prologue.chars().count(),
            server_len: rules.server_prologue.chars().count(),
            suffix: SuffixMatchBuffer::with_capacity(capacity),
            output: OutputBuffer::with_capacity(capacity),
            state: ScanState::Neutral,
            sub: SubState::Code,
            depth: 0,
            line: 1,
            region_line: 0,
            kept: 0,
            dropped: 0,
        }
    }

    fn step(&mut self, c: char) {
        self.suffix.push(c);
        self.output.push(c);

        match self.state {
            ScanState::Neutral => {
                if self.suffix.ends_with(&self.rules.client_prologue) {
                    self.enter(ScanState::InClientBlock, self.client_len);
                } else if self.suffix.ends_with(&self.rules.server_prologue) {
                    self.enter(ScanState::InServerBlock, self.server_len);
                }
            }
            ScanState::InClientBlock | ScanState::InServerBlock => {
                if self.step_region(c) {
                    self.close();
                } else if self.state != self.desired {
                    self.output.shrink(1);
                }
            }
        }

        if c == '\n' {
            self.line += 1;
        }
    }

    fn enter(&mut self, state: ScanState, prologue_len: usize) {
        trace!(line = self.line, ?state, "region opened");
        self.state = state;
        self.sub = SubState::Code;
        self.depth = 1;
        self.region_line = self.line;
        self.output.shrink(prologue_len);
    }

    /// Erases the closing brace and returns to `Neutral`.
    fn close(&mut self) {
        trace!(line = self.line, state = ?self.state, "region closed");
        if self.state == self.desired {
            self.kept += 1;
        } else {
            self.dropped += 1;
        }
        self.output.shrink(CLOSE_BRACE.len());
        self.state = ScanState::Neutral;
        self.sub = SubState::Code;
    }

    /// Advances the sub-state machine. Returns `true` when `c` is the brace
    /// that closes the region.
    fn step_region(&mut self, c: char) -> bool {
        match self.sub {
            SubState::LineComment => {
                if self.suffix.ends_with_any(&LINE_COMMENT_CLOSE) {
                    self.sub = SubState::Code;
                }
            }
            SubState::BlockComment => {
                if self.suffix.ends_with(BLOCK_COMMENT_CLOSE) {
                    self.sub = SubState::Code;
                }
            }
            SubState::StringLiteral { quote, escaped } => {
                self.sub = if escaped {
                    SubState::StringLiteral {
                        quote,
                        escaped: false,
                    }
                } else if c == '\\' {
                    SubState::StringLiteral {
                        quote,
                        escaped: true,
                    }
                } else if c == quote || (c == '\n' && quote != '`') {
                    SubState::Code
                } else {
                    self.sub
                };
            }
            SubState::Code => {
                if self.suffix.ends_with(LINE_COMMENT_OPEN) {
                    self.sub = SubState::LineComment;
                } else if self.suffix.ends_with(BLOCK_COMMENT_OPEN) {
                    self.sub = SubState::BlockComment;
                } else if self.rules.string_literals && matches!(c, '"' | '\'' | '`') {
                    self.sub = SubState::StringLiteral {
                        quote: c,
                        escaped: false,
                    };
                } else if self.suffix.ends_with(OPEN_BRACE) {
                    self.depth += 1;
                } else if self.suffix.ends_with(CLOSE_BRACE) {
                    self.depth = self.depth.saturating_sub(1);
                    return self.depth == 0;
                }
            }
        }
        false
    }
}
