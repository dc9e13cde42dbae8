//! Shopping Cart Business Logic Helpers
//!
//! This module contains helper functions for cart operations and formatting.

use super::models::{CartItem, CartView, DEFAULT_CART_ID};
use crate::error::CartError;

/// Returns the provided `cart_id`, or the shop's default cart when `None`
/// or blank.
pub fn cart_id_or_default(cart_id: Option<String>) -> String {
    cart_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CART_ID.to_string())
}

/// Rejects line items that cannot be added to a cart.
pub fn validate_item(item: &CartItem) -> Result<(), CartError> {
    if item.price < 0.0 || item.price.is_nan() {
        return Err(CartError::InvalidPrice(item.price));
    }
    if item.quantity < 1 {
        return Err(CartError::InvalidQuantity(item.quantity));
    }
    Ok(())
}

/// Merges `incoming` into `cart_items`: an existing product gets its
/// quantity increased, a new one is appended.
pub fn add_item(cart_items: &mut Vec<CartItem>, incoming: CartItem) -> Result<(), CartError> {
    if let Some(existing) = cart_items.iter_mut().find(|i| i.id == incoming.id) {
        existing.quantity = existing
            .quantity
            .checked_add(incoming.quantity)
            .ok_or_else(|| CartError::QuantityOverflow(incoming.id.clone()))?;
    } else {
        cart_items.push(incoming);
    }
    Ok(())
}

/// Sets the quantity of a product; zero or less removes the line item.
///
/// Returns `false` when the product is not in the cart.
pub fn set_quantity(cart_items: &mut Vec<CartItem>, product_id: &str, quantity: i64) -> bool {
    let Some(pos) = cart_items.iter().position(|i| i.id == product_id) else {
        return false;
    };
    if quantity <= 0 {
        cart_items.remove(pos);
    } else {
        cart_items[pos].quantity = quantity;
    }
    true
}

/// Produces a human-readable one-line summary for a list of cart items.
///
/// Example output: `"2x Juniper Starter Tree, 1x Glazed Ceramic Pot"`.
pub fn format_item_summary(items: &[CartItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Generates a receipt identifier for a checkout.
pub fn new_order_id() -> String {
    format!("order-{}", uuid::Uuid::new_v4())
}

pub fn cart_view(cart_id: &str, items: Vec<CartItem>) -> CartView {
    let item_count = items
        .iter()
        .fold(0i64, |count, i| count.saturating_add(i.quantity));
    let total = items.iter().map(|i| i.price * i.quantity as f64).sum();
    CartView {
        cart_id: cart_id.to_string(),
        items,
        item_count,
        total,
    }
}
