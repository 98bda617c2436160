//! MCP (Model Context Protocol) server core for pagemark.
//!
//! Implements the MCP protocol over newline-delimited JSON-RPC 2.0,
//! exposing a `ToolRegistry` of schema-validated tools to MCP clients.
//!
//! # Architecture
//!
//! - **types**: JSON-RPC 2.0 and MCP-specific protocol types
//! - **framing**: chunk-boundary-safe newline framing
//! - **transport**: pluggable transport layer (stdio, channels)
//! - **server**: request dispatch and tool invocation
//! - **error**: unified error types and JSON-RPC error-code mapping
//!
//! # Usage
//!
//! ```no_run
//! use pagemark_mcp::server::McpServer;
//! use pagemark_mcp::transport::StdioTransport;
//! use pagemark_toolkit::ToolRegistry;
//!
//! # async fn example() {
//! let registry = ToolRegistry::new();
//! let server = McpServer::new(registry);
//! let mut transport = StdioTransport::stdio();
//! server.run(&mut transport).await.unwrap();
//! # }
//! ```

pub mod error;
pub mod framing;
pub mod server;
pub mod transport;
pub mod types;

pub use error::McpError;
pub use framing::LineFramer;
pub use server::McpServer;
pub use transport::{ByteTransport, ChannelTransport, StdioTransport, Transport};
pub use types::*;
