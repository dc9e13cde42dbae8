//! Product Catalog Models

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// A product in the Bonsai Shop catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    pub price: f64,

    #[serde(default)]
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Anything else the catalog carries (rating, stock, ...)
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Body of `POST /api/search-products`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,

    #[serde(default)]
    pub category: Option<String>,
}
