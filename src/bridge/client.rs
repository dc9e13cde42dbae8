//! Request/response correlation over a [`Transport`]
//!
//! Outbound requests get an id of the form `ui-<n>` and a pending entry.
//! Inbound messages are fed to [`Bridge::route`], which settles pending
//! entries and hands everything else back to the caller.

use super::models::{id_key, Incoming, JsonRpcMessage, ANY_ORIGIN, UI_MESSAGE};
use super::transport::Transport;
use crate::error::BridgeError;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, RwLock,
};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Default time to wait for the host to answer a request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

type Reply = Result<Value, BridgeError>;

/// What [`Bridge::route`] did with an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// Settled one of our pending requests.
    Settled { id: String },
    /// A host request the caller must answer with [`Bridge::send_response`].
    Request {
        id: Value,
        method: String,
        params: Value,
    },
    /// A host notification for the caller to apply.
    Notification { method: String, params: Value },
    /// A response nobody is waiting for, or a malformed payload.
    Ignored,
}

/// Widget side of the host/widget messaging bridge.
///
/// Cheap to clone; clones share the pending table and learned origin.
pub struct Bridge<T: Transport> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    transport: T,
    pending: DashMap<String, oneshot::Sender<Reply>>,
    next_id: AtomicU64,
    target_origin: RwLock<Option<String>>,
    timeout: Duration,
}

impl<T: Transport> Clone for Bridge<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> Bridge<T> {
    pub fn new(transport: T) -> Self {
        Self::with_timeout(transport, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(transport: T, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                pending: DashMap::new(),
                next_id: AtomicU64::new(1),
                target_origin: RwLock::new(None),
                timeout,
            }),
        }
    }

    /// Origin used for outbound posts: `*` until the first inbound message.
    pub fn target_origin(&self) -> String {
        self.inner
            .target_origin
            .read()
            .ok()
            .and_then(|origin| origin.clone())
            .unwrap_or_else(|| ANY_ORIGIN.to_string())
    }

    pub fn pending_count(&self) -> usize {
        self.inner.pending.len()
    }

    fn post(&self, message: &JsonRpcMessage) -> Result<(), BridgeError> {
        self.inner.transport.post(message, &self.target_origin())
    }

    /// Sends a request and waits for the matching response.
    pub async fn send_request(&self, method: &str, params: Value) -> Result<Value, BridgeError> {
        let n = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let id = format!("ui-{n}");

        let (tx, rx) = oneshot::channel();
        self.inner.pending.insert(id.clone(), tx);

        let message = JsonRpcMessage::request(id.clone(), method, params);
        if let Err(e) = self.post(&message) {
            self.inner.pending.remove(&id);
            return Err(e);
        }
        debug!(%id, method, "bridge request sent");

        match tokio::time::timeout(self.inner.timeout, rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => Err(BridgeError::Closed(format!("request {id} dropped"))),
            Err(_) => {
                self.inner.pending.remove(&id);
                warn!(%id, method, "bridge request timed out");
                Err(BridgeError::Timeout {
                    id,
                    method: method.to_string(),
                    after_secs: self.inner.timeout.as_secs(),
                })
            }
        }
    }

    /// Posts a notification; no reply is expected.
    pub fn send_notification(&self, method: &str, params: Value) -> Result<(), BridgeError> {
        self.post(&JsonRpcMessage::notification(method, params))
    }

    /// Posts a notification with typed params.
    pub fn notify<P: Serialize>(&self, method: &str, params: &P) -> Result<(), BridgeError> {
        self.send_notification(method, serde_json::to_value(params)?)
    }

    /// Asks the host to add a message to the conversation.
    pub async fn send_message(&self, text: &str) -> Result<Value, BridgeError> {
        self.send_request(
            UI_MESSAGE,
            json!({ "role": "user", "content": [{ "type": "text", "text": text }] }),
        )
        .await
    }

    /// Answers a request the host sent to the widget.
    pub fn send_response(&self, id: Value, result: Value) -> Result<(), BridgeError> {
        self.post(&JsonRpcMessage::response(id, result))
    }

    /// Single entry point for everything the host posts to the widget.
    pub fn route(&self, origin: &str, data: &Value) -> Routed {
        self.learn_origin(origin);

        // A pending id wins over any other interpretation of the payload.
        if let Some(key) = data.get("id").and_then(id_key) {
            if let Some((_, tx)) = self.inner.pending.remove(&key) {
                let reply = match Incoming::classify(data) {
                    Incoming::Response { outcome, .. } => outcome.map_err(|e| BridgeError::Remote {
                        code: e.code,
                        message: e.message,
                    }),
                    _ => Ok(data.get("result").cloned().unwrap_or(Value::Null)),
                };
                // The waiter may already have given up.
                let _ = tx.send(reply);
                return Routed::Settled { id: key };
            }
        }

        match Incoming::classify(data) {
            Incoming::Request { id, method, params } => Routed::Request { id, method, params },
            Incoming::Notification { method, params } => Routed::Notification { method, params },
            Incoming::Response { id, .. } => {
                debug!(%id, "response for unknown request");
                Routed::Ignored
            }
            Incoming::Invalid => {
                debug!("ignoring non JSON-RPC message");
                Routed::Ignored
            }
        }
    }

    fn learn_origin(&self, origin: &str) {
        if origin.is_empty() || origin == "null" {
            return;
        }
        let Ok(mut target) = self.inner.target_origin.write() else {
            return;
        };
        if target.is_none() {
            debug!(origin, "learned host origin");
            *target = Some(origin.to_string());
        }
    }
}
