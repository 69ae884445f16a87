//! The fixed compiler option set, varied only by language tier.

use archprune_common::{ArchPolicy, Architecture, LanguageTier};

/// Name of the bundled output file when none is configured.
pub const DEFAULT_OUT_FILE: &str = "out.js";

/// Options handed to the compiler for one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Language-version tier of the emitted code.
    pub tier: LanguageTier,
    /// Name of the single bundled output file.
    pub out_file: String,
    /// Emit a source map next to the output.
    pub source_map: bool,
    /// Emit `"use strict"` in every file.
    pub always_strict: bool,
    /// Drop comments from emitted code.
    pub remove_comments: bool,
    /// Skip emit entirely when any error is reported.
    pub no_emit_on_error: bool,
    /// Disable strict checking of generic signatures.
    pub no_strict_generic_checks: bool,
    /// Ambient type packages to include; empty means none.
    pub types: Vec<String>,
}

impl CompileOptions {
    /// The option set for `arch`: only the tier depends on the architecture.
    pub fn for_arch(policy: &ArchPolicy, arch: &Architecture, out_file: impl Into<String>) -> Self {
        Self {
            tier: policy.language_tier(arch),
            out_file: out_file.into(),
            source_map: true,
            always_strict: true,
            remove_comments: true,
            no_emit_on_error: true,
            no_strict_generic_checks: true,
            types: Vec::new(),
        }
    }

    /// Name of the source map written next to the output file.
    pub fn map_file(&self) -> String {
        format!("{}.map", self.out_file)
    }

    /// Renders the options as `tsc` command-line flags.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--outFile".to_string(),
            self.out_file.clone(),
            "--target".to_string(),
            self.tier.target_name().to_string(),
            "--pretty".to_string(),
            "false".to_string(),
        ];
        let flags = [
            (self.source_map, "--sourceMap"),
            (self.always_strict, "--alwaysStrict"),
            (self.remove_comments, "--removeComments"),
            (self.no_emit_on_error, "--noEmitOnError"),
            (self.no_strict_generic_checks, "--noStrictGenericChecks"),
        ];
        args.extend(
            flags
                .iter()
                .filter(|(on, _)| *on)
                .map(|(_, flag)| flag.to_string()),
        );
        args.push("--types".to_string());
        args.push(self.types.join(","));
        args
    }
}
