//! Utility modules shared by the formatters.
//!
//! # Modules
//!
//! - [`text`]: Number grouping and text truncation for Markdown output

pub mod text;
