//! Review widget models

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tool name invoked on the host to apply an approved edit.
pub const APPLY_MARKDOWN_TOOL: &str = "apply-markdown";
/// Tool name invoked on the host to persist widget state.
pub const PERSIST_STATE_TOOL: &str = "persist-review-state";
/// Status line shown whenever a host round-trip fails.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// A proposed text edit waiting for user approval.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    #[serde(default)]
    pub before: String,

    #[serde(default)]
    pub after: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_id: Option<String>,

    #[serde(default)]
    pub applied: bool,
}

impl ReviewPayload {
    /// Parses a payload out of tool arguments or persisted state.
    ///
    /// Streaming arguments may be a bare object with only some fields, so
    /// anything that is an object parses; everything else is `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Arguments for the `apply-markdown` host tool.
    pub fn apply_arguments(&self) -> Value {
        json!({
            "before": self.before,
            "after": self.after,
            "canvasId": self.canvas_id,
        })
    }
}

/// Where the tool call feeding the widget currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    #[default]
    Idle,
    Streaming,
    Complete,
}

/// Locates persisted widget state inside host notification params.
///
/// Hosts put it either at `state` or at `hostContext.state`.
pub fn persisted_state(params: &Value) -> Option<&Value> {
    params
        .get("state")
        .or_else(|| params.get("hostContext").and_then(|ctx| ctx.get("state")))
        .filter(|state| !state.is_null())
}
