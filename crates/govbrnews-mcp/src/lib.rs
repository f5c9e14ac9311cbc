//! MCP surface of the GovBRNews server.
//!
//! Exposes the news collection to LLM assistants as:
//!
//! - tools: `search_news`, `get_facets`, `similar_news`, `analyze_temporal`
//! - resources: `govbrnews://stats`, `govbrnews://agencies`,
//!   `govbrnews://themes`, `govbrnews://news/{news_id}`
//! - prompts: `analyze_theme`, `compare_agencies`, `temporal_evolution`,
//!   `discover_context`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use govbrnews_mcp::GovBrNewsServer;
//! use govbrnews_search::MockSearchBackend;
//! use govbrnews_temporal::TemporalConfig;
//!
//! # async fn run() -> govbrnews_core::Result<()> {
//! let server = GovBrNewsServer::new(Arc::new(MockSearchBackend::new()), TemporalConfig::default());
//! server.serve_stdio().await
//! # }
//! ```

pub mod error;
pub mod format;
pub mod prompts;
pub mod registry;
pub mod resources;
pub mod server;
pub mod tools;

pub use error::McpErrorExt;
pub use registry::{CompositeRegistry, ToolRegistry, ToolResult};
pub use resources::NewsResources;
pub use server::GovBrNewsServer;
pub use tools::{NewsTools, TemporalTools};

/// Re-exported MCP model types.
pub use rmcp::model;
