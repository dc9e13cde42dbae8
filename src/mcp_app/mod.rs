//! MCP App bundle serving
//!
//! Pre-built widget bundles live under `{assets}/mcp-apps/{name}.html`.
//! Only names on the allow-list are ever read from disk.

use crate::error::ApiError;
use crate::state::{AppState, SharedState};
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

/// Widgets the playground knows how to serve.
pub const MCP_APPS: &[&str] = &["review-native", "bonsai-shop", "product-card"];

/// MIME type of MCP App resources.
pub const MCP_APP_MIME_TYPE: &str = "text/html;profile=mcp-app";

pub fn is_known_app(name: &str) -> bool {
    MCP_APPS.contains(&name)
}

/// `ui://` resource URI for an MCP App.
pub fn resource_uri(name: &str) -> String {
    format!("ui://botdojo/{name}.html")
}

/// Maps a `ui://` resource URI back to its app name.
pub fn app_from_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix("ui://botdojo/")
        .and_then(|rest| rest.strip_suffix(".html"))
        .filter(|name| is_known_app(name))
}

impl AppState {
    fn app_path(&self, name: &str) -> std::path::PathBuf {
        self.assets_dir.join("mcp-apps").join(format!("{name}.html"))
    }

    /// Allow-listed apps whose bundle is present on disk.
    pub async fn built_apps(&self) -> Vec<&'static str> {
        let mut built = Vec::new();
        for &name in MCP_APPS {
            if tokio::fs::try_exists(self.app_path(name)).await.unwrap_or(false) {
                built.push(name);
            }
        }
        built
    }

    /// Reads a bundled MCP App, `NotFound` for unknown or unbuilt names.
    pub async fn load_app_html(&self, name: &str) -> Result<String, ApiError> {
        if !is_known_app(name) {
            return Err(ApiError::NotFound(format!("unknown MCP app '{name}'")));
        }

        let path = self.app_path(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(html) => Ok(html),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::NotFound(format!(
                "MCP app '{name}' has not been built"
            ))),
            Err(e) => Err(ApiError::Internal(format!(
                "reading {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Creates routes for MCP App bundles
pub fn routes() -> Router<SharedState> {
    Router::new().route("/api/mcp-app/:name", get(serve_app))
}

/// Endpoint: GET /api/mcp-app/:name
async fn serve_app(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let html = state.load_app_html(&name).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        html,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_round_trip_respects_allow_list() {
        assert_eq!(app_from_uri(&resource_uri("review-native")), Some("review-native"));
        assert_eq!(app_from_uri("ui://botdojo/../secrets.html"), None);
        assert_eq!(app_from_uri("ui://other/review-native.html"), None);
    }

    #[tokio::test]
    async fn test_unknown_and_unbuilt_apps_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("mcp-apps")).unwrap();
        std::fs::write(dir.path().join("mcp-apps/review-native.html"), "<p>hi</p>").unwrap();

        let state = AppState {
            assets_dir: dir.path().to_path_buf(),
            ..AppState::new()
        };

        assert_eq!(state.load_app_html("review-native").await.unwrap(), "<p>hi</p>");
        assert!(matches!(
            state.load_app_html("product-card").await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            state.load_app_html("../Cargo").await,
            Err(ApiError::NotFound(_))
        ));
        assert_eq!(state.built_apps().await, vec!["review-native"]);
    }
}
