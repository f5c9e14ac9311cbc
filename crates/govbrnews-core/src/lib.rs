//! GovBRNews core: shared types, traits, errors, and utilities.
//!
//! This crate provides the foundational types used across all GovBRNews
//! crates. It has no internal dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: Configuration abstraction
//! - [`util`]: Text helpers for Markdown rendering

pub mod error;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use traits::ConfigProvider;

// Convenience re-exports from util
pub use util::text::group_thousands;
