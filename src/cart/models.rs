//! Shopping Cart Domain Models
//!
//! This module contains all data structures related to the Bonsai Shop
//! cart.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Cart used when the caller does not name one; mirrors the browser
/// storage key of the shop demo.
pub const DEFAULT_CART_ID: &str = "bonsai-cart";

/// Returns the default quantity (1) for cart items
fn default_quantity() -> i64 {
    1
}

/// Represents a line item in the shopping cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product identifier; one line item per product
    pub id: String,

    /// Name of the product
    pub name: String,

    /// Unit price
    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub category: String,

    /// Quantity of this item (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Captures any extra fields (e.g., imageUrl) dynamically
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Body of `PUT /api/cart/:cart_id/items/:product_id`
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityInput {
    pub quantity: i64,
}

/// Input for the `addToCart` tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    /// Items to add to the cart
    pub items: Vec<CartItem>,

    /// Optional cart identifier
    pub cart_id: Option<String>,
}

/// Input for the `updateCartItem` tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemInput {
    pub product_id: String,
    pub quantity: i64,
    pub cart_id: Option<String>,
}

/// Input for the `getCart` and `checkout` tools
#[derive(Debug, Default, Deserialize)]
pub struct CartRef {
    /// Optional cart identifier
    #[serde(rename = "cartId")]
    pub cart_id: Option<String>,
}

/// Cart contents as returned by the REST routes and tools
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub cart_id: String,
    pub items: Vec<CartItem>,
    pub item_count: i64,
    pub total: f64,
}

/// Response for checkout operations
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Status of the operation
    pub status: String,

    /// Cart identifier
    #[serde(rename = "cartId")]
    pub cart_id: String,

    /// Receipt identifier
    #[serde(rename = "orderId")]
    pub order_id: String,

    pub summary: String,
}
