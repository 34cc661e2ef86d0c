//! Model Context Protocol (MCP) server handling and JSON-RPC implementations
//!
//! Provides JSON-RPC validation and method routing shared by both transports.

pub mod rpc;
pub mod server;
