//! MCP protocol implementation.

pub mod server;
pub mod tools;

pub use server::McpServer;
pub use tools::{format_paper, ToolRegistry};
