//! Glue between the source feed, the scanner and the compile cache.
//!
//! A [`BuildSession`] receives files one at a time, writes a pruned copy of
//! each into the [`ScratchLayout`] and accumulates the copies into a compile
//! unit. Finalizing the unit compiles it through the cache and hands back
//! the output to register.

#![warn(missing_docs)]

pub mod error;
pub mod scratch;
pub mod session;

pub use error::BuildError;
pub use scratch::ScratchLayout;
pub use session::{BuildOutput, BuildSession, OutputFile};
