//! Application State
//!
//! Everything the route handlers share: the catalog, carts, canvases that
//! `apply-markdown` edits, where MCP App bundles live, and the BotDojo
//! proxy settings.

use crate::botdojo::BotDojoSettings;
use crate::cart::CartStore;
use crate::catalog::{load_catalog, Product};
use crate::config::ServerConfig;
use dashmap::DashMap;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

pub struct AppState {
    /// Product catalog, read-only after startup.
    pub catalog: Vec<Product>,

    pub carts: CartStore,

    /// Markdown documents keyed by canvas id.
    pub canvases: DashMap<String, String>,

    /// Widget state persisted by MCP Apps, keyed by widget/canvas id.
    pub widget_states: DashMap<String, serde_json::Value>,

    /// Path to the directory containing MCP App bundles.
    pub assets_dir: PathBuf,

    pub botdojo: BotDojoSettings,

    pub http: reqwest::Client,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State with the bundled catalog, in-memory carts and no BotDojo key.
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            catalog: load_catalog(None).unwrap_or_default(),
            carts: CartStore::in_memory(),
            canvases: DashMap::new(),
            widget_states: DashMap::new(),
            assets_dir: Self::locate_assets_directory(&current_dir),
            botdojo: BotDojoSettings::default(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let assets_dir = match &config.assets_dir {
            Some(dir) => dir.clone(),
            None => {
                let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                Self::locate_assets_directory(&current_dir)
            }
        };
        info!("Using assets directory: {}", assets_dir.display());

        let catalog = load_catalog(config.catalog_path.as_deref())?;
        info!("Loaded {} product(s)", catalog.len());

        let carts = match &config.cart_store {
            Some(path) => CartStore::open(path.clone()),
            None => CartStore::in_memory(),
        };

        Ok(Self {
            catalog,
            carts,
            canvases: DashMap::new(),
            widget_states: DashMap::new(),
            assets_dir,
            botdojo: BotDojoSettings::from_config(config),
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
        })
    }

    /// Attempts to locate the assets directory using a multi-step strategy
    fn locate_assets_directory(current_dir: &Path) -> PathBuf {
        // 1. ./assets
        // 2. ../assets (if running from a subdir)
        // 3. the crate's own assets (cargo run / cargo test)
        if current_dir.join("assets").exists() {
            return current_dir.join("assets");
        }

        if let Some(parent) = current_dir.parent() {
            if parent.join("assets").exists() {
                return parent.join("assets");
            }
        }

        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
    }
}
