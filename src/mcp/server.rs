//! MCP server implementation using pmcp (Pragmatic AI's rust-mcp-sdk).
//!
//! Provides the JSON-RPC plumbing over stdio and HTTP/SSE; the server
//! itself only wires the tool registry into pmcp.

use crate::arxiv::ArxivClient;
use crate::mcp::tools::ToolRegistry;
use async_trait::async_trait;
use pmcp::{
    server::streamable_http_server::StreamableHttpServer, Error, RequestHandlerExtra, Server,
    ServerCapabilities, ToolHandler, ToolInfo,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// The MCP server for arXiv Helper
///
/// Exposes the paper_search tool over stdio (for Claude Desktop and other
/// MCP clients) or HTTP/SSE.
#[derive(Debug, Clone)]
pub struct McpServer {
    tools: ToolRegistry,
}

impl McpServer {
    /// Create a new MCP server around the given arXiv client
    pub fn new(client: Arc<ArxivClient>) -> Self {
        Self {
            tools: ToolRegistry::from_client(client),
        }
    }

    /// Build the underlying pmcp server with tool handlers
    fn build_server(&self) -> Result<Server, pmcp::Error> {
        let mut builder = Server::builder()
            .name("arxiv-helper-mcp")
            .version(crate::VERSION)
            .capabilities(ServerCapabilities::default());

        for tool in self.tools.all() {
            let tool_handler = ToolWrapper {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                input_schema: tool.input_schema.clone(),
                handler: tool.handler.clone(),
            };
            builder = builder.tool(tool_handler.name.clone(), tool_handler);
        }

        builder.build()
    }

    /// Run the server in stdio mode
    ///
    /// stdout carries the protocol, so all logging must stay on stderr.
    pub async fn run(&self) -> Result<(), pmcp::Error> {
        tracing::info!("Starting MCP server in stdio mode");

        let server = self.build_server()?;

        tracing::info!("MCP server initialized");

        server.run_stdio().await
    }

    /// Run the server in HTTP/SSE mode
    pub async fn run_http(&self, addr: &str) -> Result<(SocketAddr, JoinHandle<()>), pmcp::Error> {
        tracing::info!("Starting MCP server in HTTP/SSE mode on {}", addr);

        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::invalid_params(format!("Invalid address: {}", e)))?;

        let server = Arc::new(Mutex::new(self.build_server()?));
        let http_server = StreamableHttpServer::new(socket_addr, server);

        http_server.start().await
    }
}

/// Wrapper for adapting our Tool to pmcp's ToolHandler
#[derive(Clone)]
struct ToolWrapper {
    name: String,
    description: Option<String>,
    input_schema: Value,
    handler: Arc<dyn crate::mcp::tools::ToolHandler>,
}

#[async_trait]
impl ToolHandler for ToolWrapper {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> Result<Value, Error> {
        self.handler
            .execute(args)
            .await
            .map_err(|e| Error::internal(&e))
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema.clone(),
        ))
    }
}
