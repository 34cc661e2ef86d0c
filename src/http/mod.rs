//! HTTP transport layer for the Model Context Protocol
//!
//! Provides the SSE channel at `/sse` alongside the health and descriptor endpoints.

pub mod handlers;
pub mod sessions;
