//! # arXiv Helper MCP
//!
//! A Model Context Protocol (MCP) server that lets an AI assistant search
//! for papers on arXiv.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Paper, SearchRequest, etc.)
//! - [`arxiv`]: Query construction, Atom feed parsing, and the API client
//! - [`mcp`]: MCP protocol implementation and server
//! - [`utils`]: HTTP client and retry utilities
//! - [`config`]: Configuration management
//!
//! The two testable operations are [`arxiv::build_query`] (structured
//! request to arXiv query string) and [`arxiv::parse`] (Atom feed body to
//! paper records). Both are pure functions; all I/O lives in
//! [`arxiv::ArxivClient`].

pub mod arxiv;
pub mod config;
pub mod mcp;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use arxiv::{build_query, parse, ArxivClient, ArxivError};
pub use models::{Paper, SearchRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
