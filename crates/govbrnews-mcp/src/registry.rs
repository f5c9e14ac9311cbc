//! Tool registry abstraction.
//!
//! A [`ToolRegistry`] lists MCP tools and dispatches calls to them. Each
//! group of related tools implements the trait on its own; the server
//! combines them with [`CompositeRegistry`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Boxed future returned by a tool call.
pub type ToolResult = Pin<Box<dyn Future<Output = Result<CallToolResult, ErrorData>> + Send>>;

/// A set of MCP tools.
pub trait ToolRegistry: Send + Sync {
    /// Tool definitions advertised to clients.
    fn tools(&self) -> Vec<Tool>;

    /// Starts the tool called `name`; `None` if this registry does not own it.
    fn call(&self, name: &str, args: Value) -> Option<ToolResult>;

    /// Number of tools.
    fn tool_count(&self) -> usize {
        self.tools().len()
    }

    /// True if a tool called `name` is registered.
    fn has_tool(&self, name: &str) -> bool {
        self.tools().iter().any(|t| t.name == name)
    }
}

/// Registries queried in insertion order.
#[derive(Clone, Default)]
pub struct CompositeRegistry {
    registries: Vec<Arc<dyn ToolRegistry>>,
}

impl CompositeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a registry.
    pub fn add<R: ToolRegistry + 'static>(mut self, registry: R) -> Self {
        self.registries.push(Arc::new(registry));
        self
    }
}

impl ToolRegistry for CompositeRegistry {
    fn tools(&self) -> Vec<Tool> {
        self.registries.iter().flat_map(|r| r.tools()).collect()
    }

    fn call(&self, name: &str, args: Value) -> Option<ToolResult> {
        self.registries
            .iter()
            .find(|r| r.has_tool(name))
            .and_then(|r| r.call(name, args))
    }
}
