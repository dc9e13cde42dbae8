//! Product search route

use super::{models::*, search::*};
use crate::state::SharedState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use tracing::debug;

/// Creates routes for catalog operations
pub fn routes() -> Router<SharedState> {
    Router::new().route("/api/search-products", post(search_products))
}

/// Endpoint: POST /api/search-products
/// Filters the catalog and returns products with absolute image URLs.
async fn search_products(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Json<Vec<Product>> {
    // A missing or unreadable body searches everything.
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let mut products = filter_products(
        &state.catalog,
        request.query.as_deref(),
        request.category.as_deref(),
    );
    if let Some(base) = request_base_url(&headers) {
        rewrite_image_urls(&mut products, &base);
    }

    debug!(
        query = request.query.as_deref().unwrap_or(""),
        category = request.category.as_deref().unwrap_or(ALL_CATEGORIES),
        hits = products.len(),
        "product search"
    );
    Json(products)
}
