//! Tool catalog and call dispatch
//!
//! Provides the outbound-call tool exposed over the MCP protocol

pub mod dispatcher;
pub mod tools;
