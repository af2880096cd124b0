//! Adapters: the in-memory registry and the HTTP/MCP surfaces.

pub mod gateway;
pub mod mcp;
pub mod memory;
