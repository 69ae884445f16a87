//! Option selection and the post-emit contract around an adapter.

use archprune_common::ArchPolicy;
use tracing::debug;

use crate::adapter::CompilerAdapter;
use crate::error::CompileError;
use crate::options::{CompileOptions, DEFAULT_OUT_FILE};
use crate::result::CompileResult;
use crate::sourcemap::{embed_sources, strip_source_map_reference};
use crate::unit::CompileUnit;

/// Compiles units through an adapter.
pub struct Compiler {
    adapter: Box<dyn CompilerAdapter>,
    policy: ArchPolicy,
    out_file: String,
}

impl Compiler {
    /// Wraps an adapter with the default output file name.
    pub fn new(adapter: Box<dyn CompilerAdapter>, policy: ArchPolicy) -> Self {
        Self {
            adapter,
            policy,
            out_file: DEFAULT_OUT_FILE.to_string(),
        }
    }

    /// Sets the bundled output file name passed to the adapter.
    pub fn with_out_file(mut self, out_file: impl Into<String>) -> Self {
        self.out_file = out_file.into();
        self
    }

    /// The architecture policy used to pick option tiers.
    pub fn policy(&self) -> &ArchPolicy {
        &self.policy
    }

    /// The options `unit` is compiled with.
    pub fn options_for(&self, unit: &CompileUnit) -> CompileOptions {
        CompileOptions::for_arch(&self.policy, &unit.arch, self.out_file.as_str())
    }

    /// Runs the adapter and applies the post-emit contract.
    ///
    /// When code was emitted, the source-map reference line is stripped, the
    /// map's `file` becomes the unit's output name, and every source is
    /// inlined. When emit was skipped, the result carries only diagnostics.
    pub fn compile(&self, unit: &CompileUnit) -> Result<CompileResult, CompileError> {
        let options = self.options_for(unit);
        debug!(
            adapter = self.adapter.name(),
            arch = %unit.arch,
            files = unit.files.len(),
            tier = %options.tier,
            "invoking compiler"
        );
        let raw = self.adapter.compile(&unit.files, &options)?;

        let Some(emitted) = raw.emitted else {
            debug!(diagnostics = raw.diagnostics.len(), "emit skipped");
            return Ok(CompileResult::diagnostics_only(raw.diagnostics));
        };

        let source_map = match raw.source_map {
            Some(map) => embed_sources(&map, &unit.output_name, &raw.source_base)?,
            None => String::new(),
        };

        Ok(CompileResult {
            emitted_source: strip_source_map_reference(&emitted),
            source_map,
            diagnostics: raw.diagnostics,
        })
    }
}
