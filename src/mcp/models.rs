//! MCP Protocol Models and Constants
//!
//! This module contains all data structures and constants related to the
//! Model Context Protocol (MCP) endpoint.

use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// MCP Constants
// =============================================================================

pub const SEARCH_PRODUCTS_TOOL: &str = "searchProducts";
pub const GET_CART_TOOL: &str = "getCart";
pub const ADD_TO_CART_TOOL: &str = "addToCart";
pub const UPDATE_CART_ITEM_TOOL: &str = "updateCartItem";
pub const CHECKOUT_TOOL: &str = "checkout";
pub const APPLY_MARKDOWN_TOOL: &str = crate::review::models::APPLY_MARKDOWN_TOOL;
pub const PERSIST_STATE_TOOL: &str = crate::review::models::PERSIST_STATE_TOOL;
pub const GET_REVIEW_STATE_TOOL: &str = "get-review-state";

/// Canvas edited when a call names none
pub const DEFAULT_CANVAS_ID: &str = "default";
/// Server identifier
pub const SERVER_NAME: &str = "botdojo-playground";
/// Protocol version for MCP
pub const PROTOCOL_VERSION: &str = "2025-06-18";

// JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

// =============================================================================
// MCP Protocol Models
// =============================================================================

/// Standard JSON-RPC 2.0 Request envelope
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version (should be "2.0")
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,

    /// Method name to invoke
    pub method: String,

    /// Parameters for the method
    pub params: Option<Value>,

    /// Request identifier
    pub id: Option<Value>,
}

/// Arguments of the `apply-markdown` tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyMarkdownInput {
    #[serde(default)]
    pub before: String,
    pub after: String,
    pub canvas_id: Option<String>,
}

/// Arguments of the `persist-review-state` tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistStateInput {
    pub state: Value,
    pub canvas_id: Option<String>,
}

/// Arguments of the `get-review-state` tool
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasRef {
    pub canvas_id: Option<String>,
}

/// Arguments of the `searchProducts` tool
#[derive(Debug, Default, Deserialize)]
pub struct SearchProductsInput {
    pub query: Option<String>,
    pub category: Option<String>,
}
