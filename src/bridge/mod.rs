//! Host-Widget Messaging Bridge
//!
//! JSON-RPC 2.0 over a `postMessage`-style transport:
//! - Wire models and method names
//! - Request/response correlation with timeouts
//! - Transports (in-process channel, detached)
//! - Debounced size negotiation

pub mod client;
pub mod models;
pub mod size;
pub mod transport;

pub use client::{Bridge, Routed, DEFAULT_REQUEST_TIMEOUT};
pub use size::{SizeReporter, WidgetSize};
pub use transport::{ChannelTransport, DetachedTransport, Posted, Transport};
