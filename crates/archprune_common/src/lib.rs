//! Shared foundational types used across the archprune crates.
//!
//! This crate provides build architecture identifiers, the policy that
//! classifies them into server/client and compiler language tiers, and the
//! content hash used to fingerprint cache keys.

#![warn(missing_docs)]

pub mod arch;
pub mod hash;

pub use arch::{arch_matches, ArchPolicy, Architecture, LanguageTier, DEFAULT_SERVER_ARCH};
pub use hash::ContentHash;
