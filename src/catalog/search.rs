//! Catalog filtering and image URL rewriting

use super::models::{Product, ALL_CATEGORIES};
use axum::http::HeaderMap;

/// Keeps the products matching `category` and containing `query`.
///
/// Both comparisons are case-insensitive. A missing/empty category or
/// `"all"` keeps every category; a missing/empty query keeps every product.
pub fn filter_products(products: &[Product], query: Option<&str>, category: Option<&str>) -> Vec<Product> {
    let query = query.map(str::trim).filter(|q| !q.is_empty()).map(str::to_lowercase);
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
        .map(str::to_lowercase);

    products
        .iter()
        .filter(|p| match &category {
            Some(c) => p.category.to_lowercase() == *c,
            None => true,
        })
        .filter(|p| match &query {
            Some(q) => {
                p.name.to_lowercase().contains(q)
                    || p.description.to_lowercase().contains(q)
                    || p.category.to_lowercase().contains(q)
            }
            None => true,
        })
        .cloned()
        .collect()
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        // Proxies may append a chain: "a.example, b.example"
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Derives `proto://host` from forwarded headers, falling back to `Host`.
pub fn request_base_url(headers: &HeaderMap) -> Option<String> {
    let host = header_value(headers, "x-forwarded-host").or_else(|| header_value(headers, "host"))?;
    let proto = header_value(headers, "x-forwarded-proto").unwrap_or("https");
    Some(format!("{proto}://{host}"))
}

/// Turns a relative image path into an absolute URL under `base`.
pub fn absolutize(path: &str, base: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:") {
        return path.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Rewrites `imagePath`/`imageUrl` of every product in place.
pub fn rewrite_image_urls(products: &mut [Product], base: &str) {
    for product in products {
        if let Some(path) = product.image_path.as_mut() {
            *path = absolutize(path, base);
        }
        if let Some(url) = product.image_url.as_mut() {
            *url = absolutize(url, base);
        }
    }
}
