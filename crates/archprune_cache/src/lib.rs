//! Per-architecture memoization of compile results.
//!
//! A compile unit is fingerprinted by the path and modification time of every
//! file it contains. [`CompileCache`] keeps the last result for each
//! architecture and only invokes the compiler when that fingerprint changes.
//! The cache lives for one build process and is never persisted.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod key;

pub use cache::{CacheStats, CompileCache, SharedCompileCache};
pub use error::CacheError;
pub use key::CacheKey;
