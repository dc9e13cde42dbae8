//! Shopping Cart Domain Module
//!
//! This module contains the Bonsai Shop cart, including:
//! - Domain models (CartItem, inputs, views)
//! - Business logic helpers (aggregation, quantity updates, formatting)
//! - The persisted cart store
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod state;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use state::CartStore;
