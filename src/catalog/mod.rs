//! Product Catalog Module
//!
//! In-memory Bonsai Shop catalog and the product search endpoint.

pub mod handlers;
pub mod models;
pub mod search;

pub use handlers::routes;
pub use models::Product;

use std::path::Path;
use tracing::warn;

/// Catalog shipped with the crate, used when no catalog file is configured.
const BUNDLED_CATALOG: &str = include_str!("../../assets/products.json");

/// Loads the catalog from `path`, falling back to the bundled one.
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<Vec<Product>> {
    if let Some(path) = path {
        match std::fs::read_to_string(path) {
            Ok(raw) => return Ok(serde_json::from_str(&raw)?),
            Err(e) => warn!("cannot read catalog {}: {}, using bundled catalog", path.display(), e),
        }
    }
    Ok(serde_json::from_str(BUNDLED_CATALOG)?)
}
