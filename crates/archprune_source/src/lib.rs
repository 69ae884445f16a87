//! Source file identity, logical paths, and line lookup for diagnostics.
//!
//! This crate provides [`SourceUnit`] (one input file bound to a target
//! architecture), [`LogicalPath`] for environment-root detection, the
//! [`SourceDb`] used to quote source lines in rendered diagnostics, and
//! [`ResolvedLocation`] for 1-based line/column coordinates.

#![warn(missing_docs)]

pub mod location;
pub mod logical_path;
pub mod source_db;
pub mod source_file;
pub mod source_unit;

pub use location::ResolvedLocation;
pub use logical_path::LogicalPath;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use source_unit::SourceUnit;
