//! Bridge wire models and method names
//!
//! Every message crossing the host/widget boundary is a JSON-RPC 2.0
//! envelope. Inbound envelopes are classified into [`Incoming`] before
//! anything else looks at them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Method Names
// =============================================================================

/// Host → widget handshake request
pub const INITIALIZE: &str = "ui/initialize";
/// Widget → host acknowledgement after the handshake
pub const INITIALIZED: &str = "ui/notifications/initialized";
/// Complete tool arguments
pub const TOOL_INPUT: &str = "ui/notifications/tool-input";
/// Streaming (possibly truncated) tool arguments
pub const TOOL_INPUT_PARTIAL: &str = "ui/notifications/tool-input-partial";
/// Tool execution result
pub const TOOL_RESULT: &str = "ui/notifications/tool-result";
/// Host context (theme, persisted state, ...) changed
pub const HOST_CONTEXT_CHANGED: &str = "ui/notifications/host-context-changed";
/// Widget → host size negotiation
pub const SIZE_CHANGE: &str = "ui/size-change";
/// Widget → host tool invocation
pub const TOOLS_CALL: &str = "tools/call";
/// Widget → host chat message
pub const UI_MESSAGE: &str = "ui/message";

/// Wildcard target origin used until the host origin is known
pub const ANY_ORIGIN: &str = "*";

pub const JSONRPC_VERSION: &str = "2.0";

// =============================================================================
// Envelope
// =============================================================================

/// Raw JSON-RPC 2.0 envelope as it travels over `postMessage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcMessage {
    #[serde(default)]
    pub jsonrpc: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcMessage {
    pub fn request(id: impl Into<String>, method: &str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(Value::String(id.into())),
            method: Some(method.to_string()),
            params: Some(params),
            ..Default::default()
        }
    }

    pub fn notification(method: &str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: Some(method.to_string()),
            params: Some(params),
            ..Default::default()
        }
    }

    pub fn response(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id),
            result: Some(result),
            ..Default::default()
        }
    }
}

// =============================================================================
// Classification
// =============================================================================

/// An inbound envelope sorted by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// Carries an id and no method: the answer to one of our requests.
    Response {
        id: String,
        outcome: Result<Value, RpcError>,
    },
    /// Carries a method and an id: the host expects a reply.
    Request {
        id: Value,
        method: String,
        params: Value,
    },
    /// Carries a method and no id: fire-and-forget.
    Notification { method: String, params: Value },
    /// Anything else (not an object, no method and no id, ...).
    Invalid,
}

/// Renders a JSON-RPC id as the string key used by the pending table.
pub fn id_key(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Incoming {
    /// Sorts an arbitrary `postMessage` payload by shape.
    pub fn classify(data: &Value) -> Self {
        let Ok(msg) = serde_json::from_value::<JsonRpcMessage>(data.clone()) else {
            return Incoming::Invalid;
        };

        match (msg.method, msg.id) {
            (Some(method), Some(id)) => Incoming::Request {
                id,
                method,
                params: msg.params.unwrap_or(Value::Null),
            },
            (Some(method), None) => Incoming::Notification {
                method,
                params: msg.params.unwrap_or(Value::Null),
            },
            (None, Some(id)) => match id_key(&id) {
                Some(id) => {
                    let outcome = match msg.error {
                        Some(err) => Err(err),
                        None => Ok(msg.result.unwrap_or(Value::Null)),
                    };
                    Incoming::Response { id, outcome }
                }
                None => Incoming::Invalid,
            },
            (None, None) => Incoming::Invalid,
        }
    }
}
