//! Transports carry envelopes across the host/widget boundary.
//!
//! In a browser this is `window.parent.postMessage(message, targetOrigin)`.
//! Here the seam is a trait so the bridge can run against an in-process
//! channel (tests, the demo host) or refuse to send when there is no host.

use super::models::JsonRpcMessage;
use crate::error::BridgeError;
use tokio::sync::mpsc;

/// Something the bridge can post envelopes to.
pub trait Transport: Send + Sync + 'static {
    fn post(&self, message: &JsonRpcMessage, target_origin: &str) -> Result<(), BridgeError>;
}

/// An envelope as observed on the other side of a [`ChannelTransport`].
#[derive(Debug, Clone)]
pub struct Posted {
    pub target_origin: String,
    pub message: JsonRpcMessage,
}

/// Posts envelopes into a tokio channel, standing in for the parent window.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Posted>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Posted>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn post(&self, message: &JsonRpcMessage, target_origin: &str) -> Result<(), BridgeError> {
        self.tx
            .send(Posted {
                target_origin: target_origin.to_string(),
                message: message.clone(),
            })
            .map_err(|e| BridgeError::Closed(e.to_string()))
    }
}

/// A widget rendered outside any host frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedTransport;

impl Transport for DetachedTransport {
    fn post(&self, _message: &JsonRpcMessage, _target_origin: &str) -> Result<(), BridgeError> {
        Err(BridgeError::Detached)
    }
}
