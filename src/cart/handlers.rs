//! REST API handlers for shopping cart operations
//!
//! This module implements the HTTP endpoints the Bonsai Shop front end
//! uses to read and mutate a cart.

use super::{helpers::*, models::*};
use crate::error::ApiError;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::info;

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/cart/:cart_id", get(get_cart))
        .route("/api/cart/:cart_id/items", post(add_items))
        .route(
            "/api/cart/:cart_id/items/:product_id",
            put(update_item).delete(remove_item),
        )
        .route("/api/cart/:cart_id/checkout", post(checkout))
}

/// Endpoint: GET /api/cart/:cart_id
async fn get_cart(State(state): State<SharedState>, Path(cart_id): Path<String>) -> Json<CartView> {
    let items = state.carts.items(&cart_id);
    Json(cart_view(&cart_id, items))
}

/// Endpoint: POST /api/cart/:cart_id/items
/// Accepts a single item or an array of items.
async fn add_items(
    State(state): State<SharedState>,
    Path(cart_id): Path<String>,
    Json(payload): Json<OneOrMany>,
) -> Result<Json<CartView>, ApiError> {
    let items = state.carts.add(&cart_id, payload.into_vec()).await?;
    Ok(Json(cart_view(&cart_id, items)))
}

/// Endpoint: PUT /api/cart/:cart_id/items/:product_id
async fn update_item(
    State(state): State<SharedState>,
    Path((cart_id, product_id)): Path<(String, String)>,
    Json(payload): Json<UpdateQuantityInput>,
) -> Result<Json<CartView>, ApiError> {
    let items = state
        .carts
        .update_quantity(&cart_id, &product_id, payload.quantity)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{product_id} is not in cart {cart_id}")))?;
    Ok(Json(cart_view(&cart_id, items)))
}

/// Endpoint: DELETE /api/cart/:cart_id/items/:product_id
async fn remove_item(
    State(state): State<SharedState>,
    Path((cart_id, product_id)): Path<(String, String)>,
) -> Result<Json<CartView>, ApiError> {
    let items = state
        .carts
        .remove(&cart_id, &product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{product_id} is not in cart {cart_id}")))?;
    Ok(Json(cart_view(&cart_id, items)))
}

/// Endpoint: POST /api/cart/:cart_id/checkout
/// Empties the cart and reports what was bought.
async fn checkout(
    State(state): State<SharedState>,
    Path(cart_id): Path<String>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let items = state.carts.clear(&cart_id).await?;
    let summary = format_item_summary(&items);
    info!("REST API CHECKOUT: Cart {} - {}", cart_id, summary);

    Ok(Json(CheckoutResponse {
        status: "checked_out".to_string(),
        cart_id,
        order_id: new_order_id(),
        summary,
    }))
}

/// Request body that is either one item or a list of them.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Many(Vec<CartItem>),
    One(CartItem),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<CartItem> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}
