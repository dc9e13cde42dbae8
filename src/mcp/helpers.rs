//! MCP Protocol Helpers
//!
//! This module contains helper functions for JSON-RPC communication
//! and MCP App tool metadata.

use crate::mcp_app::resource_uri;
use serde_json::{json, Value};

/// Metadata linking a tool or resource to the MCP App that renders it.
pub fn widget_meta(app: &str) -> Value {
    json!({
        "ui/resourceUri": resource_uri(app),
    })
}

/// Attaches `widget_meta(app)` to a tool or result when `app` is built.
pub fn with_widget(mut value: Value, app: &str, built: &[&str]) -> Value {
    if built.contains(&app) {
        if let Some(obj) = value.as_object_mut() {
            obj.insert("_meta".to_string(), widget_meta(app));
        }
    }
    value
}

/// Builds a tool result with one text block and structured content.
pub fn tool_result(text: impl Into<String>, structured: Value) -> Value {
    json!({
        "content": [{ "type": "text", "text": text.into() }],
        "structuredContent": structured,
    })
}

/// Builds a JSON-RPC 2.0 success response.
///
/// # Arguments
///
/// * `id` – The request identifier that must be echoed back.
/// * `result` – The payload representing the successful outcome.
pub fn rpc_success(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

/// Builds a JSON-RPC 2.0 error response.
///
/// # Arguments
///
/// * `id` – The request identifier (or `null` if unavailable).
/// * `code` – The JSON-RPC error code (e.g., -32601 for method not found).
/// * `message` – Human-readable description of the error.
pub fn rpc_error(id: Value, code: i32, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        }
    })
}

/// Replaces the first occurrence of `before` with `after` in `document`.
///
/// An empty document takes `after` as its whole content; an empty `before`
/// appends. Returns `None` when `before` does not occur.
pub fn apply_edit(document: &str, before: &str, after: &str) -> Option<String> {
    if document.is_empty() {
        return Some(after.to_string());
    }
    if before.is_empty() {
        return Some(format!("{document}\n{after}"));
    }
    document
        .find(before)
        .map(|at| format!("{}{}{}", &document[..at], after, &document[at + before.len()..]))
}
