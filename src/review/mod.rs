//! Review Widget Module
//!
//! The "review-native" MCP App: receives a proposed edit through tool
//! notifications, lets the user apply it, and persists the outcome through
//! the host.

pub mod models;
pub mod state;
pub mod widget;

pub use models::{ReviewPayload, ToolStatus};
pub use state::{ReviewPhase, ReviewState};
pub use widget::{ApplyOutcome, ReviewWidget};
