//! BotDojo Playground Library
//!
//! Backend for the BotDojo SDK playground: the host/widget messaging bridge
//! used by MCP Apps, the review widget built on it, and the HTTP service
//! (catalog search, Bonsai Shop cart, MCP App bundles, token proxy, MCP).

// Widget-side protocol
pub mod bridge;
pub mod review;

// Domain modules
pub mod botdojo;
pub mod cart;
pub mod catalog;
pub mod mcp;
pub mod mcp_app;

// Infrastructure
pub mod config;
pub mod error;
pub mod logging;
pub mod router;
pub mod state;
