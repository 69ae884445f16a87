//! The boundary to the external compiler.
//!
//! A [`CompileUnit`] (pruned files for one architecture) goes in; a
//! [`CompileResult`] (emitted code, source map, diagnostics) comes out. The
//! compiler itself sits behind the [`CompilerAdapter`] trait; [`Compiler`]
//! picks the option set for the architecture and applies the post-emit
//! contract to whatever the adapter produced.

#![warn(missing_docs)]

pub mod adapter;
pub mod compiler;
pub mod error;
pub mod options;
pub mod result;
pub mod sourcemap;
pub mod tsc;
pub mod unit;

pub use adapter::{CompilerAdapter, RawEmit};
pub use compiler::Compiler;
pub use error::CompileError;
pub use options::{CompileOptions, DEFAULT_OUT_FILE};
pub use result::CompileResult;
pub use tsc::TscCompiler;
pub use unit::CompileUnit;
