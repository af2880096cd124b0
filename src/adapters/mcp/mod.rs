//! MCP (Model Context Protocol) surface exposing `human_interaction`.
//!
//! `protocol` holds the JSON-RPC dispatch shared by the stdio and HTTP
//! transports.

pub mod http_server;
pub mod protocol;
pub mod stdio_server;

pub use http_server::{McpHttpConfig, McpHttpServer};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpHandler};
pub use stdio_server::StdioServer;
