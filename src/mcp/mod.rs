//! Model Context Protocol (MCP) Module
//!
//! This module contains the MCP endpoint, including:
//! - Protocol models (JsonRpcRequest, tool names, tool inputs)
//! - RPC helpers (success/error responses, MCP App metadata, canvas edits)
//! - MCP handlers (initialize, tools/list, tools/call, resources/*)

pub mod handlers;
pub mod helpers;
pub mod models;

// Re-export commonly used types and functions
pub use handlers::routes;
