//! The "review-native" widget: a bridge client that shows a proposed edit
//! and applies it on approval.

use super::models::{
    persisted_state, ReviewPayload, APPLY_MARKDOWN_TOOL, PERSIST_STATE_TOOL,
};
use super::state::{ReviewPhase, ReviewState};
use crate::bridge::models::{
    HOST_CONTEXT_CHANGED, INITIALIZE, INITIALIZED, TOOLS_CALL, TOOL_INPUT, TOOL_INPUT_PARTIAL,
    TOOL_RESULT,
};
use crate::bridge::{Bridge, Routed, Transport};
use crate::error::BridgeError;
use serde_json::{json, Value};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Protocol version announced in the `ui/initialize` reply.
pub const APP_PROTOCOL_VERSION: &str = "2025-06-18";
pub const APP_NAME: &str = "review-native";

/// Outcome of [`ReviewWidget::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Edit applied and persisted.
    Applied,
    /// Edit applied but persisting failed.
    AppliedNotPersisted,
    /// Nothing to apply in the current phase.
    NotReady,
}

pub struct ReviewWidget<T: Transport> {
    bridge: Bridge<T>,
    state: Mutex<ReviewState>,
}

impl<T: Transport> ReviewWidget<T> {
    pub fn new(bridge: Bridge<T>) -> Self {
        Self {
            bridge,
            state: Mutex::new(ReviewState::default()),
        }
    }

    pub fn bridge(&self) -> &Bridge<T> {
        &self.bridge
    }

    fn state(&self) -> MutexGuard<'_, ReviewState> {
        // A poisoned lock still holds consistent data; every update is a
        // single assignment sequence without panicking calls.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> ReviewState {
        self.state().clone()
    }

    pub fn phase(&self) -> ReviewPhase {
        self.state().phase
    }

    /// Feeds one inbound `postMessage` event to the widget.
    pub fn handle_message(&self, origin: &str, data: &Value) -> Result<(), BridgeError> {
        match self.bridge.route(origin, data) {
            Routed::Request { id, method, params } => self.handle_request(id, &method, &params),
            Routed::Notification { method, params } => {
                self.handle_notification(&method, &params);
                Ok(())
            }
            Routed::Settled { .. } | Routed::Ignored => Ok(()),
        }
    }

    fn handle_request(&self, id: Value, method: &str, params: &Value) -> Result<(), BridgeError> {
        if method != INITIALIZE {
            debug!(method, "stub reply to host request");
            return self
                .bridge
                .send_response(id, json!({ "ok": true, "ignored": true }));
        }

        {
            let mut state = self.state();
            state.initialize();
            if let Some(payload) = persisted_state(params).and_then(ReviewPayload::from_value) {
                state.merge_persisted(payload);
            }
        }

        self.bridge.send_response(
            id,
            json!({
                "protocolVersion": APP_PROTOCOL_VERSION,
                "appInfo": { "name": APP_NAME, "version": env!("CARGO_PKG_VERSION") },
                "appCapabilities": {},
            }),
        )?;
        self.bridge.send_notification(INITIALIZED, json!({}))?;
        info!("review widget initialized");
        Ok(())
    }

    fn handle_notification(&self, method: &str, params: &Value) {
        let mut state = self.state();
        match method {
            TOOL_INPUT_PARTIAL => {
                if let Some(payload) = params.get("arguments").and_then(ReviewPayload::from_value) {
                    state.tool_input_partial(payload);
                }
            }
            TOOL_INPUT => {
                let payload = params.get("arguments").and_then(ReviewPayload::from_value);
                state.tool_complete(payload);
            }
            TOOL_RESULT => {
                let payload = params
                    .get("structuredContent")
                    .and_then(ReviewPayload::from_value);
                state.tool_complete(payload);
            }
            HOST_CONTEXT_CHANGED => {
                if let Some(payload) = persisted_state(params).and_then(ReviewPayload::from_value) {
                    state.merge_persisted(payload);
                }
            }
            _ => debug!(method, "ignoring unknown notification"),
        }
    }

    /// Applies the pending edit through the host, then persists the result.
    pub async fn apply(&self) -> Result<ApplyOutcome, BridgeError> {
        let next = self.state().begin_apply();
        let Some(payload) = next else {
            return Ok(ApplyOutcome::NotReady);
        };

        let call = json!({
            "name": APPLY_MARKDOWN_TOOL,
            "arguments": payload.apply_arguments(),
        });
        if let Err(e) = self.bridge.send_request(TOOLS_CALL, call).await {
            warn!("apply-markdown failed: {}", e);
            self.state().apply_failed();
            return Err(e);
        }

        let persisted = {
            let mut state = self.state();
            state.apply_succeeded();
            state.payload.clone()
        };

        let call = json!({
            "name": PERSIST_STATE_TOOL,
            "arguments": { "state": persisted },
        });
        match self.bridge.send_request(TOOLS_CALL, call).await {
            Ok(_) => {
                self.state().persist_succeeded();
                Ok(ApplyOutcome::Applied)
            }
            Err(e) => {
                warn!("persisting review state failed: {}", e);
                self.state().persist_failed();
                Ok(ApplyOutcome::AppliedNotPersisted)
            }
        }
    }
}
