//! The GovBRNews MCP server.
//!
//! [`GovBrNewsServer`] wires the tools, resources and prompts to one search
//! backend and implements rmcp's `ServerHandler`. The dispatch methods are
//! also public so the server can be driven without a transport.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, GetPromptRequestParams, GetPromptResult,
    Implementation, ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult,
    ListToolsResult, PaginatedRequestParams, Prompt, ReadResourceRequestParams,
    ReadResourceResult, Resource, ResourceContents, ResourceTemplate, ServerCapabilities,
    ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;

use govbrnews_core::Error;
use govbrnews_search::SearchBackend;
use govbrnews_temporal::{Clock, SystemClock, TemporalAggregator, TemporalConfig};

use crate::prompts;
use crate::registry::{CompositeRegistry, ToolRegistry};
use crate::resources::NewsResources;
use crate::tools::{NewsTools, TemporalTools};

const INSTRUCTIONS: &str = "Servidor MCP do dataset GovBRNews: notícias do governo federal \
brasileiro. Use search_news para buscar, get_facets para agregações, similar_news para \
notícias relacionadas e analyze_temporal para distribuições no tempo. Resources: \
govbrnews://stats, govbrnews://agencies, govbrnews://themes e govbrnews://news/{id}.";

/// MCP server over the GovBRNews collection.
#[derive(Clone)]
pub struct GovBrNewsServer {
    tools: CompositeRegistry,
    resources: NewsResources,
}

impl GovBrNewsServer {
    /// Creates a server over `backend` using the system clock.
    pub fn new(backend: Arc<dyn SearchBackend>, config: TemporalConfig) -> Self {
        Self::with_clock(backend, config, Arc::new(SystemClock))
    }

    /// Creates a server whose temporal analyses read "now" from `clock`.
    pub fn with_clock(
        backend: Arc<dyn SearchBackend>,
        config: TemporalConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let aggregator = TemporalAggregator::new(Arc::clone(&backend))
            .with_config(config)
            .with_clock(clock);
        let tools = CompositeRegistry::new()
            .add(NewsTools::new(Arc::clone(&backend), config.timezone))
            .add(TemporalTools::new(aggregator));
        log::info!(
            "Registered tools: {}",
            tools
                .tools()
                .iter()
                .map(|t| t.name.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self {
            tools,
            resources: NewsResources::new(backend, config.timezone),
        }
    }

    /// Serves MCP over stdin/stdout until the client disconnects.
    ///
    /// # Errors
    ///
    /// Fails if the transport cannot be initialised or breaks.
    pub async fn serve_stdio(self) -> govbrnews_core::Result<()> {
        log::info!("Starting GovBRNews MCP server on stdio");
        let service = self.serve(stdio()).await.map_err(|e| {
            log::error!("serving error: {e:?}");
            Error::operation(format!("MCP initialisation failed: {e}"))
        })?;
        service
            .waiting()
            .await
            .map_err(|e| Error::operation(format!("MCP server task failed: {e}")))?;
        log::info!("GovBRNews MCP server stopped");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    /// Tool definitions.
    pub fn tool_list(&self) -> Vec<Tool> {
        self.tools.tools()
    }

    /// Runs tool `name` with JSON `args`.
    ///
    /// # Errors
    ///
    /// `invalid_params` for an unknown tool or malformed arguments.
    pub async fn call(&self, name: &str, args: Value) -> Result<CallToolResult, McpError> {
        log::info!("Tool call: {name} {args}");
        match self.tools.call(name, args) {
            Some(fut) => fut.await,
            None => Err(McpError::invalid_params(
                format!("Unknown tool: {name}"),
                None,
            )),
        }
    }

    /// Fixed resources.
    pub fn resource_list(&self) -> Vec<Resource> {
        self.resources.resources()
    }

    /// Resource templates.
    pub fn resource_template_list(&self) -> Vec<ResourceTemplate> {
        self.resources.templates()
    }

    /// Reads the resource at `uri`.
    ///
    /// # Errors
    ///
    /// See [`NewsResources::read`].
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let text = self.resources.read(uri).await?;
        Ok(ReadResourceResult::new(vec![ResourceContents::text(
            text, uri,
        )]))
    }

    /// Prompt definitions.
    pub fn prompt_list(&self) -> Vec<Prompt> {
        prompts::list()
    }

    /// Expands prompt `name`.
    ///
    /// # Errors
    ///
    /// See [`prompts::get`].
    pub fn prompt(
        &self,
        name: &str,
        arguments: Option<&serde_json::Map<String, Value>>,
    ) -> Result<GetPromptResult, McpError> {
        prompts::get(name, arguments)
    }
}

impl ServerHandler for GovBrNewsServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = "govbrnews-mcp".to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();

        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_resources()
            .enable_prompts()
            .build();
        info.server_info = server_info;
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = match request.arguments {
            Some(map) => Value::Object(map),
            None => Value::Object(serde_json::Map::new()),
        };
        self.call(&request.name, args).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_list()))
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(self.resource_list()))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult::with_all_items(
            self.resource_template_list(),
        ))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read(&request.uri).await
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(self.prompt_list()))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.prompt(&request.name, request.arguments.as_ref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use govbrnews_search::MockSearchBackend;

    fn server() -> GovBrNewsServer {
        GovBrNewsServer::new(Arc::new(MockSearchBackend::new()), TemporalConfig::default())
    }

    #[test]
    fn test_server_info() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "govbrnews-mcp");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_some());
        assert!(info.instructions.unwrap().contains("analyze_temporal"));
    }

    #[test]
    fn test_tool_list() {
        let names: Vec<String> = server()
            .tool_list()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(
            names,
            ["search_news", "get_facets", "similar_news", "analyze_temporal"]
        );
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = server().call("delete_all", Value::Null).await.unwrap_err();
        assert!(err.message.contains("delete_all"));
    }
}
